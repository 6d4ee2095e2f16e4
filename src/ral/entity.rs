use super::access::service_error;
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::services::directory::{Entity, LookupEntitiesRequest};

/// Modifiers for entity lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityQueryOption {
    /// Skip the access check. Only for internal callers that have already
    /// established the caller's right to see the result.
    Unauthorized,
}

impl ResourceAccessor {
    /// Look up exactly one entity. No match is not-found; several matches
    /// means the directory broke an invariant.
    pub(crate) async fn single_entity(
        &self,
        ctx: &RequestContext,
        key: &str,
        req: LookupEntitiesRequest,
    ) -> Result<Entity> {
        let what = format!("entity {}", key);
        let mut entities = self
            .directory
            .lookup_entities(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .entities;

        match entities.len() {
            0 => Err(Error::not_found(ctx, &what)),
            1 => Ok(entities.remove(0)),
            n => Err(Error::internal_msg(
                ctx,
                format!("Expected 1 entity for {} but got {}", key, n),
            )),
        }
    }
}
