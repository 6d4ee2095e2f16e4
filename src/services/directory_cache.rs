//! Directory client that memoises entity lookups in the request's entity
//! cache. Any mutating call clears the cache.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::directory::*;
use super::ServiceResult;
use crate::context::RequestContext;

pub struct CachedDirectoryClient {
    inner: Arc<dyn DirectoryClient>,
    hits: AtomicU64,
    misses: AtomicU64,
    busts: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub busts: u64,
}

impl CachedDirectoryClient {
    pub fn new(inner: Arc<dyn DirectoryClient>) -> Self {
        Self {
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            busts: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            busts: self.busts.load(Ordering::Relaxed),
        }
    }

    fn bust(&self, ctx: &RequestContext) {
        self.busts.fetch_add(1, Ordering::Relaxed);
        ctx.entities().clear();
    }
}

/// Order-insensitive fields are sorted so equivalent lookups share a key
fn normalize(req: &mut LookupEntitiesRequest) {
    req.statuses.sort();
    req.root_types.sort();
    req.child_types.sort();
    if let Some(info) = req.requested_information.as_mut() {
        info.entity_information.sort();
    }
    if let LookupKey::BatchEntityIds(ids) = &mut req.key {
        ids.sort();
    }
}

fn signature(req: &LookupEntitiesRequest) -> Option<String> {
    match serde_json::to_string(req) {
        Ok(sig) => Some(sig),
        Err(e) => {
            tracing::warn!("Failed to compute lookup signature, bypassing cache: {}", e);
            None
        }
    }
}

#[async_trait]
impl DirectoryClient for CachedDirectoryClient {
    async fn lookup_entities(
        &self,
        ctx: &RequestContext,
        mut req: LookupEntitiesRequest,
    ) -> ServiceResult<LookupEntitiesResponse> {
        normalize(&mut req);
        let sig = signature(&req);

        if let Some(entities) = sig.as_deref().and_then(|sig| ctx.entities().get(sig)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(LookupEntitiesResponse { entities });
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let resp = self.inner.lookup_entities(ctx, req).await?;
        if let Some(sig) = sig {
            ctx.entities().set(sig, resp.entities.clone());
        }
        Ok(resp)
    }

    async fn lookup_entities_by_contact(
        &self,
        ctx: &RequestContext,
        req: LookupEntitiesByContactRequest,
    ) -> ServiceResult<LookupEntitiesByContactResponse> {
        self.inner.lookup_entities_by_contact(ctx, req).await
    }

    async fn lookup_entity_domain(
        &self,
        ctx: &RequestContext,
        req: LookupEntityDomainRequest,
    ) -> ServiceResult<LookupEntityDomainResponse> {
        self.inner.lookup_entity_domain(ctx, req).await
    }

    async fn create_contact(
        &self,
        ctx: &RequestContext,
        req: CreateContactRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.create_contact(ctx, req).await
    }

    async fn create_contacts(
        &self,
        ctx: &RequestContext,
        req: CreateContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.create_contacts(ctx, req).await
    }

    async fn update_contacts(
        &self,
        ctx: &RequestContext,
        req: UpdateContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.update_contacts(ctx, req).await
    }

    async fn delete_contacts(
        &self,
        ctx: &RequestContext,
        req: DeleteContactsRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.delete_contacts(ctx, req).await
    }

    async fn create_entity(
        &self,
        ctx: &RequestContext,
        req: CreateEntityRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.create_entity(ctx, req).await
    }

    async fn update_entity(
        &self,
        ctx: &RequestContext,
        req: UpdateEntityRequest,
    ) -> ServiceResult<EntityResponse> {
        self.bust(ctx);
        self.inner.update_entity(ctx, req).await
    }

    async fn create_entity_domain(
        &self,
        ctx: &RequestContext,
        req: CreateEntityDomainRequest,
    ) -> ServiceResult<CreateEntityDomainResponse> {
        self.bust(ctx);
        self.inner.create_entity_domain(ctx, req).await
    }

    async fn serialized_entity_contact(
        &self,
        ctx: &RequestContext,
        req: SerializedEntityContactRequest,
    ) -> ServiceResult<SerializedEntityContactResponse> {
        self.inner.serialized_entity_contact(ctx, req).await
    }
}
