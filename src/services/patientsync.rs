use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::context::RequestContext;

/// External EHR a practice syncs patients from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    #[default]
    Unknown,
    Hint,
    Elation,
    Drchrono,
    CsvUpload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncThreadType {
    #[default]
    Secure,
    Standard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    pub tag: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfiguration {
    pub organization_id: String,
    pub source: SyncSource,
    pub thread_type: SyncThreadType,
    #[serde(default)]
    pub tag_mappings: Vec<TagMapping>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureSyncRequest {
    pub organization_id: String,
    pub source: SyncSource,
    pub thread_type: SyncThreadType,
    #[serde(default)]
    pub tag_mappings: Vec<TagMapping>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureSyncResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupSyncConfigurationRequest {
    pub organization_id: String,
    pub source: SyncSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupSyncConfigurationResponse {
    pub config: Option<SyncConfiguration>,
}

#[async_trait]
pub trait PatientSyncClient: Send + Sync {
    async fn configure_sync(
        &self,
        ctx: &RequestContext,
        req: ConfigureSyncRequest,
    ) -> ServiceResult<ConfigureSyncResponse>;

    async fn lookup_sync_configuration(
        &self,
        ctx: &RequestContext,
        req: LookupSyncConfigurationRequest,
    ) -> ServiceResult<LookupSyncConfigurationResponse>;
}
