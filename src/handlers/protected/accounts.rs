use axum::extract::{Extension, Path};

use crate::context::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};
use crate::ral::ResourceAccessor;
use crate::services::auth::Account;

/// GET /api/accounts/:id - the caller's own account
pub async fn account_get(
    Extension(ctx): Extension<RequestContext>,
    Extension(ral): Extension<ResourceAccessor>,
    Path(id): Path<String>,
) -> ApiResult<Account> {
    let account = ral.account(&ctx, &id).await?;
    Ok(ApiResponse::success(account))
}
