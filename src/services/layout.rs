use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::context::RequestContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitLayoutVersion {
    pub id: String,
    pub visit_layout_id: String,
    pub intake_layout_location: String,
    pub review_layout_location: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitLayout {
    pub id: String,
    pub name: String,
    pub internal_name: String,
    pub category_id: String,
    pub version: Option<VisitLayoutVersion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitLayoutRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitLayoutByVersionRequest {
    pub visit_layout_version_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitLayoutResponse {
    pub visit_layout: Option<VisitLayout>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetVisitLayoutVersionRequest {
    pub visit_layout_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitLayoutVersionResponse {
    pub visit_layout_version: Option<VisitLayoutVersion>,
}

#[async_trait]
pub trait LayoutClient: Send + Sync {
    async fn get_visit_layout(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutRequest,
    ) -> ServiceResult<VisitLayoutResponse>;

    async fn get_visit_layout_by_version(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutByVersionRequest,
    ) -> ServiceResult<VisitLayoutResponse>;

    async fn get_visit_layout_version(
        &self,
        ctx: &RequestContext,
        req: GetVisitLayoutVersionRequest,
    ) -> ServiceResult<VisitLayoutVersionResponse>;
}
