mod common;

use anyhow::Result;
use care_gateway::services::directory::EntityStatus;
use care_gateway::services::threading::{
    MarkThreadsAsReadRequest, MessagePost, PostMessageRequest, ThreadWatermark,
};
use care_gateway::ErrorKind;
use common::{accessor, context_for, member, provider, FakeBackend};

fn post(thread_id: &str, from: &str) -> PostMessageRequest {
    PostMessageRequest {
        uuid: "u_1".to_string(),
        thread_id: thread_id.to_string(),
        from_entity_id: from.to_string(),
        message: MessagePost {
            text: "hello".to_string(),
            summary: "hello".to_string(),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn account_is_only_visible_to_itself() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    let acc_2 = provider("acc_2");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_account(&acc_2, "e_2", &["org_A"]);
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.account(&ctx, "acc_2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert_eq!(fake.total_calls(), 0, "denial must not reach any service");

    let account = ral.account(&ctx, "acc_1").await?;
    assert_eq!(account, acc_1);
    assert_eq!(fake.calls("get_account"), 1);
    assert_eq!(fake.calls("lookup_entities"), 0);
    Ok(())
}

#[tokio::test]
async fn allowed_post_forwards_once_and_caches_orgs() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let resp = ral.post_message(&ctx, post("t_1", "e_1")).await?;

    assert_eq!(fake.calls("post_message"), 1);
    let item = resp.item.expect("item returned");
    assert_eq!(item.id, "ti_u_1");
    assert_eq!(resp.thread.map(|t| t.id), Some("t_1".to_string()));

    let thread_orgs = ral.cached_orgs("t_1").expect("thread cached");
    let account_orgs = ral.cached_orgs("acc_1").expect("account cached");
    assert_eq!(thread_orgs.into_iter().collect::<Vec<_>>(), vec!["org_A"]);
    assert_eq!(account_orgs.into_iter().collect::<Vec<_>>(), vec!["org_A"]);
    Ok(())
}

#[tokio::test]
async fn cross_org_post_is_denied_without_forwarding() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_2", "org_B");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.post_message(&ctx, post("t_2", "e_1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert_eq!(
        err.user_message(),
        "This account is not authorized to access the requested resource."
    );
    assert!(err.developer_message().contains("t_2"));
    assert_eq!(fake.calls("thread"), 1, "one refresh of the thread");
    assert_eq!(fake.calls("lookup_entities"), 1, "one refresh of the account");
    assert_eq!(fake.calls("post_message"), 0);
    Ok(())
}

#[tokio::test]
async fn cache_hit_skips_refresh() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    ral.post_message(&ctx, post("t_1", "e_1")).await?;
    ral.post_message(&ctx, post("t_1", "e_1")).await?;

    assert_eq!(fake.calls("post_message"), 2);
    assert_eq!(fake.calls("thread"), 1);
    assert_eq!(fake.calls("lookup_entities"), 1);
    Ok(())
}

#[tokio::test]
async fn stale_membership_is_refreshed_on_miss() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_2", "org_B");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.can_post_message(&ctx, "t_2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);

    // The account joins org_B after the first decision was cached
    fake.add_account(&acc_1, "e_1", &["org_A", "org_B"]);
    ral.can_post_message(&ctx, "t_2").await?;

    assert_eq!(fake.calls("thread"), 2);
    assert_eq!(fake.calls("lookup_entities"), 2);
    let orgs = ral.cached_orgs("acc_1").expect("account cached");
    assert!(orgs.contains("org_B"));
    Ok(())
}

#[tokio::test]
async fn concurrent_checks_share_one_refresh() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let (a, b) = tokio::join!(
        ral.can_post_message(&ctx, "t_1"),
        ral.can_post_message(&ctx, "t_1")
    );
    a?;
    b?;

    assert_eq!(fake.calls("thread"), 1);
    assert_eq!(fake.calls("lookup_entities"), 1);
    Ok(())
}

#[tokio::test]
async fn missing_account_is_not_authenticated() -> Result<()> {
    let fake = FakeBackend::new();
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = care_gateway::context::RequestContext::new("req-anon");

    let err = ral.post_message(&ctx, post("t_1", "e_1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    assert_eq!(err.user_message(), "Please sign in to continue.");
    assert_eq!(err.request_id(), "req-anon");
    assert_eq!(fake.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_thread_is_not_found() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.thread(&ctx, "t_missing", "e_1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.developer_message().contains("t_missing"));
    assert!(ral.cached_orgs("t_missing").is_none(), "failures are not cached");
    Ok(())
}

#[tokio::test]
async fn single_entity_lookup_requires_exactly_one_match() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_duplicate_entity("e_dup", &["org_A"]);
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.entity(&ctx, "e_none", Vec::new(), 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ral.entity(&ctx, "e_dup", Vec::new(), 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.developer_message().contains("e_dup"));

    let entity = ral.entity(&ctx, "e_1", Vec::new(), 0).await?;
    assert_eq!(entity.id, "e_1");
    Ok(())
}

#[tokio::test]
async fn account_with_several_entities_is_internal() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    {
        let mut state = fake.state();
        let extra = common::member("e_1b", &["org_A"]);
        if let Some(entities) = state.external_ids.get_mut("acc_1") {
            entities.push(extra);
        }
    }
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral.can_post_message(&ctx, "t_1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.developer_message().contains("acc_1"));
    Ok(())
}

#[tokio::test]
async fn scoped_accessor_starts_with_empty_map() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    ral.can_post_message(&ctx, "t_1").await?;
    let scoped = ral.scoped();
    assert!(scoped.cached_orgs("t_1").is_none());
    assert!(ral.cached_orgs("t_1").is_some());

    scoped.can_post_message(&ctx, "t_1").await?;
    assert_eq!(fake.calls("thread"), 2);
    Ok(())
}

#[tokio::test]
async fn member_entities_resolve_through_memberships() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_entity(member("e_pat", &["org_A"]));
    fake.add_entity(member("e_other", &["org_B"]));
    fake.add_thread("t_1", "org_A");
    fake.set_thread_primary_entity("t_1", "e_pat");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let threads = ral.threads_for_member(&ctx, "e_pat", false).await?;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].id, "t_1");
    let orgs = ral.cached_orgs("e_pat").expect("entity cached");
    assert!(orgs.contains("org_A"));

    let err = ral
        .threads_for_member(&ctx, "e_other", false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert_eq!(fake.calls("threads_for_member"), 1);
    Ok(())
}

#[tokio::test]
async fn inactive_entities_are_still_authorized() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_entity(member("e_x", &["org_A"]));
    fake.set_entity_status("e_x", EntityStatus::Suspended);
    fake.set_entity_status("e_1", EntityStatus::Deleted);
    fake.add_thread("t_1", "org_A");
    fake.set_thread_primary_entity("t_1", "e_x");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let threads = ral.threads_for_member(&ctx, "e_x", false).await?;
    assert_eq!(threads.len(), 1);
    ral.can_post_message(&ctx, "t_1").await?;
    Ok(())
}

#[tokio::test]
async fn foreign_external_id_needs_a_shared_org() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    let acc_2 = provider("acc_2");
    let acc_3 = provider("acc_3");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_account(&acc_2, "e_2", &["org_B"]);
    fake.add_account(&acc_3, "e_3", &["org_A", "org_C"]);
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    let err = ral
        .entities_for_external_id(&ctx, "acc_2", Vec::new(), 0, Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);

    let entities = ral
        .entities_for_external_id(&ctx, "acc_3", Vec::new(), 0, Vec::new())
        .await?;
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].id, "e_3");

    let missing = ral
        .entities_for_external_id(&ctx, "acc_none", Vec::new(), 0, Vec::new())
        .await?;
    assert!(missing.is_empty());
    Ok(())
}

fn watermarks(entity_id: &str, thread_ids: &[&str]) -> MarkThreadsAsReadRequest {
    MarkThreadsAsReadRequest {
        thread_watermarks: thread_ids
            .iter()
            .map(|id| ThreadWatermark {
                thread_id: id.to_string(),
                last_message_timestamp: 10,
            })
            .collect(),
        entity_id: entity_id.to_string(),
        seen: true,
        timestamp: 20,
    }
}

#[tokio::test]
async fn mark_threads_as_read_checks_entity_and_threads() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_entity(member("e_2", &["org_A"]));
    fake.add_thread("t_1", "org_A");
    fake.add_thread("t_2", "org_B");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    ral.mark_threads_as_read(&ctx, watermarks("e_1", &[])).await?;
    assert_eq!(fake.total_calls(), 0, "empty watermarks are a no-op");

    let err = ral
        .mark_threads_as_read(&ctx, watermarks("e_2", &["t_1"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);

    let err = ral
        .mark_threads_as_read(&ctx, watermarks("e_1", &["t_1", "t_2"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    assert!(err.developer_message().contains("t_2"));
    assert_eq!(fake.calls("mark_threads_as_read"), 0);

    ral.mark_threads_as_read(&ctx, watermarks("e_1", &["t_1"])).await?;
    assert_eq!(fake.calls("mark_threads_as_read"), 1);
    Ok(())
}

#[tokio::test]
async fn account_entities_are_shared_between_checks() -> Result<()> {
    let fake = FakeBackend::new();
    let acc_1 = provider("acc_1");
    fake.add_account(&acc_1, "e_1", &["org_A"]);
    fake.add_thread("t_1", "org_A");
    let ral = accessor(&fake);
    let ctx = context_for(&acc_1);

    ral.can_post_message(&ctx, "t_1").await?;
    assert_eq!(fake.calls("lookup_entities"), 1);

    ral.mark_threads_as_read(&ctx, watermarks("e_1", &["t_1"])).await?;
    assert_eq!(fake.calls("lookup_entities"), 1);
    assert_eq!(ctx.account_entities().get("account:acc_1").map(|e| e.len()), Some(1));
    Ok(())
}
