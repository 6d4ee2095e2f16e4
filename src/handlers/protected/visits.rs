use axum::extract::{Extension, Path, State};
use chrono::Utc;

use crate::context::RequestContext;
use crate::dispatch::VisitSubmitted;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::ral::ResourceAccessor;
use crate::services::care::Visit;

/// POST /api/visits/:id/submit - patients submit their own visits
pub async fn visit_submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(ral): Extension<ResourceAccessor>,
    Path(id): Path<String>,
) -> ApiResult<Visit> {
    let visit = ral.submit_visit(&ctx, &id).await?;

    state
        .dispatcher
        .publish_async(VisitSubmitted {
            visit_id: visit.id.clone(),
            entity_id: visit.entity_id.clone(),
            organization_id: visit.organization_id.clone(),
            submitted_at: visit.submitted_at.unwrap_or_else(Utc::now),
        })
        .await;

    Ok(ApiResponse::success(visit))
}
