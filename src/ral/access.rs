use std::sync::Arc;
use tracing::debug;

use super::{OrgSet, ResourceAccessor};
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::services::auth::Account;
use crate::services::care::GetVisitRequest;
use crate::services::directory::{
    Entity, EntityType, LookupEntitiesRequest, RequestedInformation,
};
use crate::services::threading::{SavedQueryRequest, ThreadItemRequest, ThreadRequest};
use crate::services::ServiceError;

/// How to resolve the organizations that own a resource id on a cache miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Entity,
    Organization,
    Thread,
    ThreadItem,
    SavedQuery,
    Visit,
}

impl ResourceKind {
    fn label(&self) -> &'static str {
        match self {
            ResourceKind::Entity => "entity",
            ResourceKind::Organization => "organization",
            ResourceKind::Thread => "thread",
            ResourceKind::ThreadItem => "thread item",
            ResourceKind::SavedQuery => "saved query",
            ResourceKind::Visit => "visit",
        }
    }
}

/// Organizations an entity belongs to. An organization is a member of itself.
pub fn organization_ids(entity: &Entity) -> OrgSet {
    let mut orgs: OrgSet = entity
        .memberships
        .iter()
        .filter(|membership| membership.is_organization())
        .map(|membership| membership.id.clone())
        .collect();
    if entity.is_organization() {
        orgs.insert(entity.id.clone());
    }
    orgs
}

/// Key under which an account's entities are kept in the request cache
pub(crate) fn account_entities_key(account_id: &str) -> String {
    format!("account:{}", account_id)
}

fn overlaps(a: Option<&OrgSet>, b: Option<&OrgSet>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_disjoint(b),
        _ => false,
    }
}

/// Translate a downstream failure. Not-found and expired keep their meaning,
/// everything else becomes an internal error.
#[track_caller]
pub(crate) fn service_error(ctx: &RequestContext, what: &str, err: ServiceError) -> Error {
    match err {
        ServiceError::NotFound(_) => Error::not_found(ctx, what),
        ServiceError::Expired(_) => Error::expired(ctx, what),
        err => Error::internal(ctx, err),
    }
}

impl ResourceAccessor {
    /// Succeeds when the caller's organizations overlap the resource's.
    pub(crate) async fn can_access_resource(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        kind: ResourceKind,
    ) -> Result<()> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;

        let resource_orgs = self.rmap.get(resource_id);
        let account_orgs = self.rmap.get(&account.id);
        if overlaps(resource_orgs.as_deref(), account_orgs.as_deref()) {
            return Ok(());
        }

        debug!(
            "Authorization: Miss - Refreshing information for account {} and resource {}",
            account.id, resource_id
        );
        let resource_orgs = self
            .rmap
            .refresh(resource_id, || self.orgs_for(ctx, resource_id, kind))
            .await?;
        let account_orgs = self
            .rmap
            .refresh(&account.id, || self.orgs_for_external_id(ctx, &account.id))
            .await?;

        if overlaps(Some(&resource_orgs), Some(&account_orgs)) {
            Ok(())
        } else {
            Err(Error::not_authorized(ctx, resource_id))
        }
    }

    /// Accounts are only accessible to themselves
    pub(crate) fn can_access_account(
        &self,
        ctx: &RequestContext,
        account_id: &str,
    ) -> Result<Arc<Account>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        if account.id != account_id {
            return Err(Error::not_authorized(ctx, account_id));
        }
        Ok(account)
    }

    /// Organizations of the calling account, cached in the resource map
    pub(crate) async fn caller_orgs(&self, ctx: &RequestContext) -> Result<Arc<OrgSet>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        if let Some(orgs) = self.rmap.get(&account.id) {
            return Ok(orgs);
        }
        self.rmap
            .refresh(&account.id, || self.orgs_for_external_id(ctx, &account.id))
            .await
    }

    async fn orgs_for(&self, ctx: &RequestContext, id: &str, kind: ResourceKind) -> Result<OrgSet> {
        let what = format!("{} {}", kind.label(), id);
        let org_id = match kind {
            ResourceKind::Organization => Some(id.to_string()),
            ResourceKind::Entity => return self.orgs_for_entity(ctx, id).await,
            ResourceKind::Thread => self
                .threading
                .thread(
                    ctx,
                    ThreadRequest {
                        thread_id: id.to_string(),
                        viewer_entity_id: String::new(),
                    },
                )
                .await
                .map_err(|e| service_error(ctx, &what, e))?
                .thread
                .map(|thread| thread.organization_id),
            ResourceKind::ThreadItem => self
                .threading
                .thread_item(
                    ctx,
                    ThreadItemRequest {
                        item_id: id.to_string(),
                        viewer_entity_id: String::new(),
                    },
                )
                .await
                .map_err(|e| service_error(ctx, &what, e))?
                .item
                .map(|item| item.organization_id),
            ResourceKind::SavedQuery => self
                .threading
                .saved_query(
                    ctx,
                    SavedQueryRequest {
                        saved_query_id: id.to_string(),
                    },
                )
                .await
                .map_err(|e| service_error(ctx, &what, e))?
                .saved_query
                .map(|sq| sq.organization_id),
            ResourceKind::Visit => self
                .care
                .get_visit(ctx, GetVisitRequest { id: id.to_string() })
                .await
                .map_err(|e| service_error(ctx, &what, e))?
                .visit
                .map(|visit| visit.organization_id),
        };

        let org_id = org_id.ok_or_else(|| Error::not_found(ctx, &what))?;
        Ok(std::iter::once(org_id).filter(|id| !id.is_empty()).collect())
    }

    /// Membership lookups carry no status filter: authorization covers every
    /// existing entity, whatever its status.
    async fn orgs_for_entity(&self, ctx: &RequestContext, entity_id: &str) -> Result<OrgSet> {
        let entity = self
            .single_entity(
                ctx,
                entity_id,
                LookupEntitiesRequest::by_entity_id(entity_id)
                    .with_information(RequestedInformation::memberships())
                    .with_child_types(vec![EntityType::Organization]),
            )
            .await?;
        Ok(organization_ids(&entity))
    }

    async fn orgs_for_external_id(
        &self,
        ctx: &RequestContext,
        external_id: &str,
    ) -> Result<OrgSet> {
        let entities = self
            .directory
            .lookup_entities(
                ctx,
                LookupEntitiesRequest::by_external_id(external_id)
                    .with_information(RequestedInformation::memberships())
                    .with_child_types(vec![EntityType::Organization]),
            )
            .await
            .map_err(|e| service_error(ctx, &format!("entity for external id {}", external_id), e))?
            .entities;

        match entities.as_slice() {
            [entity] => {
                ctx.account_entities()
                    .set(account_entities_key(external_id), entities.clone());
                Ok(organization_ids(entity))
            }
            _ => Err(Error::internal_msg(
                ctx,
                format!(
                    "Expected only 1 entity to be returned for external id {} but found {}",
                    external_id,
                    entities.len()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str) -> Entity {
        Entity {
            id: id.to_string(),
            entity_type: EntityType::Organization,
            ..Default::default()
        }
    }

    #[test]
    fn test_organization_ids_of_member() {
        let entity = Entity {
            id: "e_1".to_string(),
            entity_type: EntityType::Internal,
            memberships: vec![
                org("o_1"),
                Entity {
                    id: "team_1".to_string(),
                    entity_type: EntityType::System,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let orgs = organization_ids(&entity);
        assert_eq!(orgs.len(), 1);
        assert!(orgs.contains("o_1"));
    }

    #[test]
    fn test_organization_is_member_of_itself() {
        let orgs = organization_ids(&org("o_1"));
        assert!(orgs.contains("o_1"));
    }

    #[test]
    fn test_overlaps() {
        let a: OrgSet = ["o_1".to_string()].into_iter().collect();
        let b: OrgSet = ["o_1".to_string(), "o_2".to_string()].into_iter().collect();
        assert!(overlaps(Some(&a), Some(&b)));
        assert!(!overlaps(Some(&a), None));
        assert!(!overlaps(Some(&a), Some(&OrgSet::new())));
    }
}
