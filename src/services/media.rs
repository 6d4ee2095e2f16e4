use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ServiceResult;
use crate::context::RequestContext;

/// Kind of resource a piece of media is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaOwnerType {
    #[default]
    Unknown,
    Organization,
    Entity,
    Account,
    Thread,
    ThreadItem,
    Visit,
    SavedMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaOwner {
    pub owner_type: MediaOwnerType,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,
    pub url: String,
    pub mime_type: String,
    pub name: String,
    pub duration_ns: u64,
    pub owner: MediaOwner,
    pub public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimMediaRequest {
    pub media_ids: Vec<String>,
    pub owner_type: MediaOwnerType,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimMediaResponse {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneMediaRequest {
    pub media_ids: Vec<String>,
    pub owner_type: MediaOwnerType,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneMediaResponse {
    pub media_infos: Vec<MediaInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfosRequest {
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfosResponse {
    pub media_infos: HashMap<String, MediaInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMediaRequest {
    pub media_id: String,
    pub public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMediaResponse {
    pub media_info: Option<MediaInfo>,
}

#[async_trait]
pub trait MediaClient: Send + Sync {
    async fn claim_media(
        &self,
        ctx: &RequestContext,
        req: ClaimMediaRequest,
    ) -> ServiceResult<ClaimMediaResponse>;

    async fn clone_media(
        &self,
        ctx: &RequestContext,
        req: CloneMediaRequest,
    ) -> ServiceResult<CloneMediaResponse>;

    async fn media_infos(
        &self,
        ctx: &RequestContext,
        req: MediaInfosRequest,
    ) -> ServiceResult<MediaInfosResponse>;

    async fn update_media(
        &self,
        ctx: &RequestContext,
        req: UpdateMediaRequest,
    ) -> ServiceResult<UpdateMediaResponse>;
}
