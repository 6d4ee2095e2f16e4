use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::services::media::MediaOwnerType;
use crate::services::threading::*;

impl ResourceAccessor {
    pub async fn can_post_message(&self, ctx: &RequestContext, thread_id: &str) -> Result<()> {
        self.can_access_resource(ctx, thread_id, ResourceKind::Thread).await
    }

    pub async fn create_empty_thread(
        &self,
        ctx: &RequestContext,
        req: CreateEmptyThreadRequest,
    ) -> Result<Thread> {
        self.can_access_resource(ctx, &req.organization_id, ResourceKind::Organization)
            .await?;
        self.threading
            .create_empty_thread(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "thread", e))?
            .thread
            .ok_or_else(|| Error::internal_msg(ctx, "threading returned no thread on create"))
    }

    pub async fn thread(
        &self,
        ctx: &RequestContext,
        thread_id: &str,
        viewer_entity_id: &str,
    ) -> Result<Thread> {
        self.can_access_resource(ctx, thread_id, ResourceKind::Thread).await?;
        let what = format!("thread {}", thread_id);
        self.threading
            .thread(
                ctx,
                ThreadRequest {
                    thread_id: thread_id.to_string(),
                    viewer_entity_id: viewer_entity_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .thread
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    /// Batch thread read. The viewer must be one of the caller's entities and
    /// every returned thread must sit in one of the caller's organizations.
    pub async fn threads(&self, ctx: &RequestContext, req: ThreadsRequest) -> Result<Vec<Thread>> {
        let (entity_ids, orgs) = self.caller_entity_orgs(ctx).await?;
        if !req.viewer_entity_id.is_empty() && !entity_ids.contains(&req.viewer_entity_id) {
            return Err(Error::not_authorized(ctx, &req.viewer_entity_id));
        }

        let threads = self
            .threading
            .threads(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "threads", e))?
            .threads;
        if let Some(thread) = threads.iter().find(|t| !orgs.contains(&t.organization_id)) {
            return Err(Error::not_authorized(ctx, &thread.id));
        }
        Ok(threads)
    }

    pub async fn thread_item(&self, ctx: &RequestContext, item_id: &str) -> Result<ThreadItem> {
        self.can_access_resource(ctx, item_id, ResourceKind::ThreadItem).await?;
        let what = format!("thread item {}", item_id);
        self.threading
            .thread_item(
                ctx,
                ThreadItemRequest {
                    item_id: item_id.to_string(),
                    viewer_entity_id: String::new(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .item
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn thread_items(
        &self,
        ctx: &RequestContext,
        req: ThreadItemsRequest,
    ) -> Result<ThreadItemsResponse> {
        self.can_access_resource(ctx, &req.thread_id, ResourceKind::Thread).await?;
        let what = format!("thread {}", req.thread_id);
        self.threading
            .thread_items(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))
    }

    pub async fn thread_item_view_details(
        &self,
        ctx: &RequestContext,
        item_id: &str,
    ) -> Result<Vec<ThreadItemViewDetails>> {
        self.can_access_resource(ctx, item_id, ResourceKind::ThreadItem).await?;
        let resp = self
            .threading
            .thread_item_view_details(
                ctx,
                ThreadItemViewDetailsRequest {
                    item_id: item_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("thread item {}", item_id), e))?;
        Ok(resp.item_view_details)
    }

    pub async fn threads_for_member(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        primary_only: bool,
    ) -> Result<Vec<Thread>> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        let resp = self
            .threading
            .threads_for_member(
                ctx,
                ThreadsForMemberRequest {
                    entity_id: entity_id.to_string(),
                    primary_only,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("threads for entity {}", entity_id), e))?;
        Ok(resp.threads)
    }

    pub async fn query_threads(
        &self,
        ctx: &RequestContext,
        req: QueryThreadsRequest,
    ) -> Result<QueryThreadsResponse> {
        self.can_access_resource(ctx, &req.organization_id, ResourceKind::Organization)
            .await?;
        self.threading
            .query_threads(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "threads", e))
    }

    pub async fn mark_thread_as_read(
        &self,
        ctx: &RequestContext,
        thread_id: &str,
        entity_id: &str,
    ) -> Result<()> {
        self.can_access_resource(ctx, thread_id, ResourceKind::Thread).await?;
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        self.threading
            .mark_threads_as_read(
                ctx,
                MarkThreadsAsReadRequest {
                    thread_watermarks: vec![ThreadWatermark {
                        thread_id: thread_id.to_string(),
                        last_message_timestamp: 0,
                    }],
                    entity_id: entity_id.to_string(),
                    seen: true,
                    timestamp: chrono::Utc::now().timestamp().max(0) as u64,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("thread {}", thread_id), e))?;
        Ok(())
    }

    /// The entity must be one of the caller's and every thread must be in
    /// one of the caller's organizations. An empty watermark list is a no-op.
    pub async fn mark_threads_as_read(
        &self,
        ctx: &RequestContext,
        req: MarkThreadsAsReadRequest,
    ) -> Result<()> {
        if req.thread_watermarks.is_empty() {
            return Ok(());
        }

        let (entity_ids, orgs) = self.caller_entity_orgs(ctx).await?;
        if !entity_ids.contains(&req.entity_id) {
            return Err(Error::not_authorized(ctx, &req.entity_id));
        }

        let threads = self
            .threading
            .threads(
                ctx,
                ThreadsRequest {
                    thread_ids: req
                        .thread_watermarks
                        .iter()
                        .map(|w| w.thread_id.clone())
                        .collect(),
                    viewer_entity_id: String::new(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "threads", e))?
            .threads;
        if let Some(thread) = threads.iter().find(|t| !orgs.contains(&t.organization_id)) {
            return Err(Error::not_authorized(ctx, &thread.id));
        }

        self.threading
            .mark_threads_as_read(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "threads", e))?;
        Ok(())
    }

    pub async fn post_message(
        &self,
        ctx: &RequestContext,
        req: PostMessageRequest,
    ) -> Result<PostMessageResponse> {
        self.can_post_message(ctx, &req.thread_id).await?;
        let what = format!("thread {}", req.thread_id);
        self.threading
            .post_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))
    }

    /// The caller needs access to both the thread and the acting entity
    pub async fn delete_thread(
        &self,
        ctx: &RequestContext,
        thread_id: &str,
        entity_id: &str,
    ) -> Result<()> {
        self.can_access_resource(ctx, thread_id, ResourceKind::Thread).await?;
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        self.threading
            .delete_thread(
                ctx,
                DeleteThreadRequest {
                    thread_id: thread_id.to_string(),
                    actor_entity_id: entity_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("thread {}", thread_id), e))?;
        self.rmap.evict(thread_id);
        Ok(())
    }

    pub async fn create_saved_query(
        &self,
        ctx: &RequestContext,
        req: CreateSavedQueryRequest,
    ) -> Result<SavedQuery> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        self.threading
            .create_saved_query(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "saved query", e))?
            .saved_query
            .ok_or_else(|| Error::internal_msg(ctx, "threading returned no saved query on create"))
    }

    pub async fn saved_query(
        &self,
        ctx: &RequestContext,
        saved_query_id: &str,
    ) -> Result<SavedQuery> {
        self.can_access_resource(ctx, saved_query_id, ResourceKind::SavedQuery)
            .await?;
        let what = format!("saved query {}", saved_query_id);
        self.threading
            .saved_query(
                ctx,
                SavedQueryRequest {
                    saved_query_id: saved_query_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .saved_query
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn saved_queries(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
    ) -> Result<Vec<SavedQuery>> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        let resp = self
            .threading
            .saved_queries(
                ctx,
                SavedQueriesRequest {
                    entity_id: entity_id.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("saved queries for {}", entity_id), e))?;
        Ok(resp.saved_queries)
    }

    pub async fn saved_query_templates(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
    ) -> Result<Vec<SavedQuery>> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        let resp = self
            .threading
            .saved_query_templates(
                ctx,
                SavedQueriesRequest {
                    entity_id: entity_id.to_string(),
                },
            )
            .await
            .map_err(|e| {
                service_error(ctx, &format!("saved query templates for {}", entity_id), e)
            })?;
        Ok(resp.saved_queries)
    }

    /// Only the owning entity's account may edit a saved query
    pub async fn update_saved_query(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedQueryRequest,
    ) -> Result<SavedQuery> {
        let existing = self.saved_query(ctx, &req.saved_query_id).await?;
        self.assert_is_entity(ctx, &existing.entity_id).await?;

        let what = format!("saved query {}", req.saved_query_id);
        self.threading
            .update_saved_query(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .saved_query
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn tags(&self, ctx: &RequestContext, req: TagsRequest) -> Result<Vec<Tag>> {
        self.can_access_resource(ctx, &req.organization_id, ResourceKind::Organization)
            .await?;
        let resp = self
            .threading
            .tags(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "tags", e))?;
        Ok(resp.tags)
    }

    pub async fn create_saved_message(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        req: CreateSavedMessageRequest,
    ) -> Result<SavedMessage> {
        self.can_access_resource(ctx, organization_id, ResourceKind::Organization)
            .await?;
        self.threading
            .create_saved_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "saved message", e))?
            .saved_message
            .ok_or_else(|| {
                Error::internal_msg(ctx, "threading returned no saved message on create")
            })
    }

    pub(super) async fn lookup_saved_message(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<SavedMessage> {
        let what = format!("saved message {}", id);
        self.threading
            .saved_messages(
                ctx,
                SavedMessagesRequest {
                    by: SavedMessagesBy::Ids(vec![id.to_string()]),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .saved_messages
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn delete_saved_message(
        &self,
        ctx: &RequestContext,
        req: DeleteSavedMessageRequest,
    ) -> Result<()> {
        let existing = self.lookup_saved_message(ctx, &req.saved_message_id).await?;
        self.can_access_resource(ctx, &existing.organization_id, ResourceKind::Organization)
            .await?;
        let what = format!("saved message {}", req.saved_message_id);
        self.threading
            .delete_saved_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?;
        Ok(())
    }

    pub async fn saved_messages(
        &self,
        ctx: &RequestContext,
        req: SavedMessagesRequest,
    ) -> Result<Vec<SavedMessage>> {
        if let SavedMessagesBy::EntityIds(ids) = &req.by {
            for id in ids {
                self.can_access_resource(ctx, id, ResourceKind::Entity).await?;
            }
        }

        let saved_messages = self
            .threading
            .saved_messages(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "saved messages", e))?
            .saved_messages;
        for message in &saved_messages {
            self.can_access_resource(ctx, &message.organization_id, ResourceKind::Organization)
                .await?;
        }
        Ok(saved_messages)
    }

    pub async fn update_saved_message(
        &self,
        ctx: &RequestContext,
        req: UpdateSavedMessageRequest,
    ) -> Result<SavedMessage> {
        let existing = self.lookup_saved_message(ctx, &req.saved_message_id).await?;
        self.can_access_resource(ctx, &existing.organization_id, ResourceKind::Organization)
            .await?;
        let what = format!("saved message {}", req.saved_message_id);
        self.threading
            .update_saved_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .saved_message
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    pub async fn create_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: CreateScheduledMessageRequest,
    ) -> Result<ScheduledMessage> {
        Policy::Provider.check(ctx)?;
        self.can_post_message(ctx, &req.thread_id).await?;
        let what = format!("thread {}", req.thread_id);
        self.threading
            .create_scheduled_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .scheduled_message
            .ok_or_else(|| {
                Error::internal_msg(ctx, "threading returned no scheduled message on create")
            })
    }

    pub(super) async fn lookup_scheduled_message(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ScheduledMessage> {
        let what = format!("scheduled message {}", id);
        self.threading
            .scheduled_messages(
                ctx,
                ScheduledMessagesRequest {
                    lookup: ScheduledMessagesLookup::ScheduledMessageId(id.to_string()),
                    statuses: Vec::new(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .scheduled_messages
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    /// Returns the deleted message as it was before deletion
    pub async fn delete_scheduled_message(
        &self,
        ctx: &RequestContext,
        req: DeleteScheduledMessageRequest,
    ) -> Result<ScheduledMessage> {
        Policy::Provider.check(ctx)?;
        let existing = self
            .lookup_scheduled_message(ctx, &req.scheduled_message_id)
            .await?;
        self.can_post_message(ctx, &existing.thread_id).await?;
        let what = format!("scheduled message {}", req.scheduled_message_id);
        self.threading
            .delete_scheduled_message(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?;
        Ok(existing)
    }

    pub async fn scheduled_messages(
        &self,
        ctx: &RequestContext,
        req: ScheduledMessagesRequest,
    ) -> Result<Vec<ScheduledMessage>> {
        let thread_id = match &req.lookup {
            ScheduledMessagesLookup::ThreadId(id) => id.clone(),
            ScheduledMessagesLookup::ScheduledMessageId(id) => {
                self.lookup_scheduled_message(ctx, id).await?.thread_id
            }
        };
        self.can_access_resource(ctx, &thread_id, ResourceKind::Thread).await?;

        let resp = self
            .threading
            .scheduled_messages(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("scheduled messages for {}", thread_id), e))?;
        Ok(resp.scheduled_messages)
    }

    pub async fn batch_jobs(
        &self,
        ctx: &RequestContext,
        req: BatchJobsRequest,
    ) -> Result<Vec<BatchJob>> {
        let jobs = self
            .threading
            .batch_jobs(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "batch jobs", e))?
            .batch_jobs;
        for job in &jobs {
            self.can_access_resource(ctx, &job.requesting_entity_id, ResourceKind::Entity)
                .await?;
        }
        Ok(jobs)
    }

    /// Every targeted thread and the requesting entity must be accessible
    pub async fn batch_post_messages(
        &self,
        ctx: &RequestContext,
        req: BatchPostMessagesRequest,
    ) -> Result<BatchJob> {
        self.can_access_resource(ctx, &req.requesting_entity_id, ResourceKind::Entity)
            .await?;
        for post in &req.post_messages_requests {
            self.can_post_message(ctx, &post.thread_id).await?;
        }
        self.threading
            .batch_post_messages(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "batch job", e))?
            .batch_job
            .ok_or_else(|| Error::internal_msg(ctx, "threading returned no batch job"))
    }

    pub async fn clone_attachments(
        &self,
        ctx: &RequestContext,
        req: CloneAttachmentsRequest,
    ) -> Result<Vec<Attachment>> {
        let kind = match req.owner_type {
            MediaOwnerType::Thread => ResourceKind::Thread,
            MediaOwnerType::ThreadItem => ResourceKind::ThreadItem,
            MediaOwnerType::Organization => ResourceKind::Organization,
            other => {
                return Err(Error::internal_msg(
                    ctx,
                    format!("cannot clone attachments to owner type {:?}", other),
                ))
            }
        };
        self.can_access_resource(ctx, &req.owner_id, kind).await?;
        let resp = self
            .threading
            .clone_attachments(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "attachments", e))?;
        Ok(resp.attachments)
    }
}
