//! Resource access layer.
//!
//! Every operation the gateway performs against a downstream service goes
//! through `ResourceAccessor`, which checks that the caller may touch the
//! resource before forwarding the call. Access is decided by organization
//! overlap: a caller may access a resource when at least one organization the
//! caller's account belongs to also owns the resource. The resource -> org
//! map is cached and refreshed on a miss.

mod access;
mod auth;
mod care;
mod care_plans;
mod directory;
mod entity;
mod excomms;
mod media;
mod payments;
mod resource_map;
mod threading;

use std::sync::Arc;

use crate::services::{
    AuthClient, CareClient, Clients, DirectoryClient, ExCommsClient, LayoutClient, MediaClient,
    PatientSyncClient, PaymentsClient, ThreadsClient,
};

pub use access::{organization_ids, ResourceKind};
pub use entity::EntityQueryOption;
pub use resource_map::{OrgSet, ResourceMap};

#[derive(Clone)]
pub struct ResourceAccessor {
    rmap: Arc<ResourceMap>,
    auth: Arc<dyn AuthClient>,
    directory: Arc<dyn DirectoryClient>,
    threading: Arc<dyn ThreadsClient>,
    excomms: Arc<dyn ExCommsClient>,
    layout: Arc<dyn LayoutClient>,
    care: Arc<dyn CareClient>,
    media: Arc<dyn MediaClient>,
    payments: Arc<dyn PaymentsClient>,
    patientsync: Arc<dyn PatientSyncClient>,
}

impl ResourceAccessor {
    pub fn new(clients: Clients) -> Self {
        Self {
            rmap: Arc::new(ResourceMap::new()),
            auth: clients.auth,
            directory: clients.directory,
            threading: clients.threading,
            excomms: clients.excomms,
            layout: clients.layout,
            care: clients.care,
            media: clients.media,
            payments: clients.payments,
            patientsync: clients.patientsync,
        }
    }

    /// Same clients, fresh resource map. Used when the map is scoped to a
    /// single request.
    pub fn scoped(&self) -> Self {
        Self {
            rmap: Arc::new(ResourceMap::new()),
            ..self.clone()
        }
    }

    /// Drop any cached organizations for a resource or account
    pub fn evict(&self, id: &str) {
        self.rmap.evict(id);
    }

    pub fn cached_orgs(&self, id: &str) -> Option<OrgSet> {
        self.rmap.get(id).map(|orgs| (*orgs).clone())
    }
}
