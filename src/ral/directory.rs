use std::collections::HashSet;

use super::access::{account_entities_key, organization_ids, service_error, ResourceKind};
use super::{EntityQueryOption, OrgSet, ResourceAccessor};
use crate::context::{Platform, RequestContext};
use crate::error::{Error, Result};
use crate::services::directory::*;

impl ResourceAccessor {
    /// Entities matching a lookup. The caller must be able to access every
    /// entity id named by the key; external and account id keys must name the
    /// caller's own account.
    pub async fn entities(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesRequest,
        opts: &[EntityQueryOption],
    ) -> Result<Vec<Entity>> {
        if !opts.contains(&EntityQueryOption::Unauthorized) {
            let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
            match &req.key {
                LookupKey::EntityId(id) => {
                    self.can_access_resource(ctx, id, ResourceKind::Entity).await?;
                }
                LookupKey::ExternalId(id) | LookupKey::AccountId(id) => {
                    if *id != account.id {
                        return Err(Error::not_authorized(ctx, id));
                    }
                }
                LookupKey::BatchEntityIds(ids) => {
                    for id in ids {
                        self.can_access_resource(ctx, id, ResourceKind::Entity).await?;
                    }
                }
            }
        }

        match self.directory.lookup_entities(ctx, req).await {
            Ok(resp) => Ok(resp.entities),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(Error::internal(ctx, e)),
        }
    }

    pub async fn entity(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        info: Vec<EntityInformation>,
        depth: i64,
    ) -> Result<Entity> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        if let Some(entity) = ctx.entities().get_only(entity_id) {
            if info.is_empty() {
                return Ok(entity);
            }
        }

        let entity = self
            .single_entity(
                ctx,
                entity_id,
                LookupEntitiesRequest::by_entity_id(entity_id).with_information(
                    RequestedInformation {
                        depth,
                        entity_information: info,
                    },
                ),
            )
            .await?;
        ctx.entities().set(entity_id, vec![entity.clone()]);
        Ok(entity)
    }

    pub async fn entities_by_contact(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesByContactRequest,
    ) -> Result<Vec<Entity>> {
        match self.directory.lookup_entities_by_contact(ctx, req).await {
            Ok(resp) => Ok(resp.entities),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(Error::internal(ctx, e)),
        }
    }

    /// Entities mapped to an external id. The caller must share an
    /// organization with the resolved entities unless the id is the caller's
    /// own account.
    pub async fn entities_for_external_id(
        &self,
        ctx: &RequestContext,
        external_id: &str,
        info: Vec<EntityInformation>,
        depth: i64,
        statuses: Vec<EntityStatus>,
    ) -> Result<Vec<Entity>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;

        let mut entity_information = info;
        if !entity_information.contains(&EntityInformation::Memberships) {
            entity_information.push(EntityInformation::Memberships);
        }
        let entities = self
            .entities(
                ctx,
                LookupEntitiesRequest::by_external_id(external_id)
                    .with_information(RequestedInformation {
                        depth,
                        entity_information,
                    })
                    .with_statuses(statuses),
                &[EntityQueryOption::Unauthorized],
            )
            .await?;

        if entities.is_empty() || external_id == account.id {
            return Ok(entities);
        }

        let entity_orgs: OrgSet = entities.iter().flat_map(organization_ids).collect();
        let caller_orgs = self.caller_orgs(ctx).await?;
        if entity_orgs.is_disjoint(&caller_orgs) {
            return Err(Error::not_authorized(ctx, external_id));
        }
        Ok(entities)
    }

    /// The entity an account holds within an organization
    pub async fn entity_for_account_id(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        account_id: &str,
    ) -> Result<Entity> {
        self.can_access_resource(ctx, organization_id, ResourceKind::Organization)
            .await?;

        let entities = self
            .entities(
                ctx,
                LookupEntitiesRequest::by_account_id(account_id)
                    .with_information(RequestedInformation::memberships())
                    .with_statuses(vec![EntityStatus::Active])
                    .with_child_types(vec![EntityType::Organization]),
                &[EntityQueryOption::Unauthorized],
            )
            .await?;

        entities
            .into_iter()
            .find(|entity| organization_ids(entity).contains(organization_id))
            .ok_or_else(|| {
                Error::not_found(
                    ctx,
                    &format!(
                        "entity for account {} in organization {}",
                        account_id, organization_id
                    ),
                )
            })
    }

    /// The entity, provided it belongs to the calling account
    pub async fn assert_is_entity(&self, ctx: &RequestContext, entity_id: &str) -> Result<Entity> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        let entity = self
            .single_entity(ctx, entity_id, LookupEntitiesRequest::by_entity_id(entity_id))
            .await?;
        if entity.account_id != account.id {
            return Err(Error::not_authorized(ctx, entity_id));
        }
        Ok(entity)
    }

    /// Ids of the entities owned by the calling account, with memberships
    pub(crate) async fn caller_entities(&self, ctx: &RequestContext) -> Result<Vec<Entity>> {
        let account = ctx.account().ok_or_else(|| Error::not_authenticated(ctx))?;
        let key = account_entities_key(&account.id);
        if let Some(entities) = ctx.account_entities().get(&key) {
            return Ok(entities);
        }

        let entities = self
            .entities(
                ctx,
                LookupEntitiesRequest {
                    key: LookupKey::AccountId(account.id.clone()),
                    requested_information: Some(RequestedInformation::memberships()),
                    root_types: vec![EntityType::Internal, EntityType::Patient],
                    child_types: vec![EntityType::Organization],
                    ..Default::default()
                },
                &[],
            )
            .await?;
        ctx.account_entities().set(key, entities.clone());
        Ok(entities)
    }

    /// Only authorizes when an entity id is given
    pub async fn entity_domain(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        domain: &str,
    ) -> Result<LookupEntityDomainResponse> {
        if !entity_id.is_empty() {
            self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        }
        self.directory
            .lookup_entity_domain(
                ctx,
                LookupEntityDomainRequest {
                    entity_id: entity_id.to_string(),
                    domain: domain.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("domain {}", domain), e))
    }

    pub async fn create_contact(
        &self,
        ctx: &RequestContext,
        req: CreateContactRequest,
    ) -> Result<EntityResponse> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let entity_id = req.entity_id.clone();
        self.directory
            .create_contact(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("entity {}", entity_id), e))
    }

    pub async fn create_contacts(
        &self,
        ctx: &RequestContext,
        req: CreateContactsRequest,
    ) -> Result<EntityResponse> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let entity_id = req.entity_id.clone();
        self.directory
            .create_contacts(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("entity {}", entity_id), e))
    }

    pub async fn update_contacts(
        &self,
        ctx: &RequestContext,
        req: UpdateContactsRequest,
    ) -> Result<Entity> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let entity_id = req.entity_id.clone();
        self.directory
            .update_contacts(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("entity {}", entity_id), e))?
            .entity
            .ok_or_else(|| Error::not_found(ctx, &format!("entity {}", entity_id)))
    }

    pub async fn delete_contacts(
        &self,
        ctx: &RequestContext,
        req: DeleteContactsRequest,
    ) -> Result<Entity> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let entity_id = req.entity_id.clone();
        self.directory
            .delete_contacts(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("entity {}", entity_id), e))?
            .entity
            .ok_or_else(|| Error::not_found(ctx, &format!("entity {}", entity_id)))
    }

    /// Not authorized: new entities are created on behalf of an organization
    /// the caller may not belong to yet, as during patient signup.
    pub async fn create_entity(
        &self,
        ctx: &RequestContext,
        req: CreateEntityRequest,
    ) -> Result<Entity> {
        self.directory
            .create_entity(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "entity", e))?
            .entity
            .ok_or_else(|| Error::internal_msg(ctx, "directory returned no entity on create"))
    }

    pub async fn update_entity(
        &self,
        ctx: &RequestContext,
        req: UpdateEntityRequest,
    ) -> Result<Entity> {
        self.can_access_resource(ctx, &req.entity_id, ResourceKind::Entity).await?;
        let entity_id = req.entity_id.clone();
        ctx.entities().delete(&entity_id);
        self.directory
            .update_entity(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &format!("entity {}", entity_id), e))?
            .entity
            .ok_or_else(|| Error::not_found(ctx, &format!("entity {}", entity_id)))
    }

    pub async fn create_entity_domain(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        subdomain: &str,
    ) -> Result<()> {
        self.can_access_resource(ctx, organization_id, ResourceKind::Organization)
            .await?;
        self.directory
            .create_entity_domain(
                ctx,
                CreateEntityDomainRequest {
                    entity_id: organization_id.to_string(),
                    domain: subdomain.to_string(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, &format!("organization {}", organization_id), e))?;
        Ok(())
    }

    pub async fn serialized_entity_contact(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        platform: Platform,
    ) -> Result<SerializedClientEntityContact> {
        self.can_access_resource(ctx, entity_id, ResourceKind::Entity).await?;
        let what = format!(
            "serialized contact info for entity {} on platform {:?}",
            entity_id, platform
        );
        self.directory
            .serialized_entity_contact(
                ctx,
                SerializedEntityContactRequest {
                    entity_id: entity_id.to_string(),
                    platform,
                },
            )
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .serialized_entity_contact
            .ok_or_else(|| Error::not_found(ctx, &what))
    }

    /// Organization ids the caller's entities belong to
    pub(crate) async fn caller_entity_orgs(
        &self,
        ctx: &RequestContext,
    ) -> Result<(HashSet<String>, OrgSet)> {
        let entities = self.caller_entities(ctx).await?;
        let ids = entities.iter().map(|entity| entity.id.clone()).collect();
        let orgs = entities.iter().flat_map(organization_ids).collect();
        Ok((ids, orgs))
    }
}
