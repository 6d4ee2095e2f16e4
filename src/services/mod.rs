//! Downstream service clients.
//!
//! Each service is reached through an async trait so the access layer can be
//! exercised against in-memory fakes. `HttpServiceClient` is the production
//! implementation of every trait.

pub mod auth;
pub mod care;
pub mod directory;
pub mod directory_cache;
pub mod excomms;
pub mod http;
pub mod layout;
pub mod media;
pub mod patientsync;
pub mod payments;
pub mod threading;

use std::sync::Arc;
use thiserror::Error;

pub use auth::AuthClient;
pub use care::CareClient;
pub use directory::DirectoryClient;
pub use directory_cache::CachedDirectoryClient;
pub use excomms::ExCommsClient;
pub use http::HttpServiceClient;
pub use layout::LayoutClient;
pub use media::MediaClient;
pub use patientsync::PatientSyncClient;
pub use payments::PaymentsClient;
pub use threading::ThreadsClient;

/// Failure reported by a downstream service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("expired: {0}")]
    Expired(String),

    #[error("deadline exceeded calling {0}")]
    DeadlineExceeded(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Handles to every downstream service
#[derive(Clone)]
pub struct Clients {
    pub auth: Arc<dyn AuthClient>,
    pub directory: Arc<dyn DirectoryClient>,
    pub threading: Arc<dyn ThreadsClient>,
    pub excomms: Arc<dyn ExCommsClient>,
    pub layout: Arc<dyn LayoutClient>,
    pub care: Arc<dyn CareClient>,
    pub media: Arc<dyn MediaClient>,
    pub payments: Arc<dyn PaymentsClient>,
    pub patientsync: Arc<dyn PatientSyncClient>,
}

impl Clients {
    /// HTTP clients for every service, with directory lookups memoised
    pub fn from_config(config: &crate::config::ServicesConfig) -> anyhow::Result<Self> {
        let timeout = std::time::Duration::from_millis(config.timeout_ms);
        let client = |name: &'static str, url: &str| HttpServiceClient::new(name, url, timeout);

        Ok(Self {
            auth: Arc::new(client("auth", &config.auth_url)?),
            directory: Arc::new(CachedDirectoryClient::new(Arc::new(client(
                "directory",
                &config.directory_url,
            )?))),
            threading: Arc::new(client("threading", &config.threading_url)?),
            excomms: Arc::new(client("excomms", &config.excomms_url)?),
            layout: Arc::new(client("layout", &config.layout_url)?),
            care: Arc::new(client("care", &config.care_url)?),
            media: Arc::new(client("media", &config.media_url)?),
            payments: Arc::new(client("payments", &config.payments_url)?),
            patientsync: Arc::new(client("patientsync", &config.patientsync_url)?),
        })
    }
}
