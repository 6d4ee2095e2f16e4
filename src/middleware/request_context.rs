use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ResourceMapScope;
use crate::context::{DeviceHeaders, Feature, Platform, RequestContext};
use crate::error::ErrorKind;
use crate::handlers::AppState;
use crate::ral::ResourceAccessor;
use crate::services::directory::{EntityInformation, EntityStatus};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const DEVICE_ID_HEADER: &str = "x-device-id";
pub const PLATFORM_HEADER: &str = "x-platform";
pub const APP_VERSION_HEADER: &str = "x-app-version";
pub const DEVICE_MODEL_HEADER: &str = "x-device-model";
const AUTH_COOKIE: &str = "at";

/// Build the request context and resolve the caller's account.
///
/// A request without a token, or with a token the auth service rejects,
/// continues unauthenticated; the handler's policy decides what that means.
/// The context and the access layer to use are inserted as extensions.
pub async fn request_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut ctx = RequestContext::new(request_id.clone())
        .with_query(format!("{} {}", request.method(), request.uri()))
        .with_timeout(Duration::from_millis(state.config.server.request_timeout_ms));
    if let Some(device) = device_headers(headers) {
        ctx = ctx.with_device(device);
    }

    let ral = match state.config.access.resource_map_scope {
        ResourceMapScope::Request => state.ral.scoped(),
        ResourceMapScope::Process => state.ral.clone(),
    };

    if let Some(token) = bearer_token(headers) {
        ctx = ctx.with_auth_token(token.clone());
        match ral.check_authentication(&ctx, &token).await {
            Ok(resp) if resp.is_authenticated => {
                ctx.swap_account(resp.account);
                if let Some(auth_token) = resp.token {
                    if !auth_token.client_encryption_key.is_empty() {
                        ctx = ctx.with_client_encryption_key(auth_token.client_encryption_key);
                    }
                }
            }
            Ok(_) => debug!("Request {}: token not authenticated", request_id),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::Expired) => {
                debug!("Request {}: {}", request_id, e);
            }
            Err(e) => return e.into_response(),
        }
    }

    ctx = with_video_calling(ctx, ral.clone(), state.config.features.video_calling_org_ids.clone());

    request.extensions_mut().insert(ctx);
    request.extensions_mut().insert(ral);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Video calling is on for providers in one of the configured organizations.
/// Resolved on first use since it costs a directory lookup.
fn with_video_calling(
    ctx: RequestContext,
    ral: ResourceAccessor,
    org_ids: Vec<String>,
) -> RequestContext {
    if org_ids.is_empty() {
        return ctx.with_feature(Feature::VideoCalling, false);
    }

    ctx.with_lazy_feature(Feature::VideoCalling, move |ctx| {
        let ral = ral.clone();
        let org_ids = org_ids.clone();
        async move {
            let account = match ctx.account() {
                Some(account) if account.is_provider() => account,
                _ => return false,
            };
            match ral
                .entities_for_external_id(
                    &ctx,
                    &account.id,
                    vec![EntityInformation::Memberships],
                    0,
                    vec![EntityStatus::Active],
                )
                .await
            {
                Ok(entities) => entities
                    .iter()
                    .flat_map(crate::ral::organization_ids)
                    .any(|org| org_ids.contains(&org)),
                Err(e) => {
                    warn!("Failed to evaluate video calling for {}: {}", account.id, e);
                    false
                }
            }
        }
        .boxed()
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn device_headers(headers: &HeaderMap) -> Option<DeviceHeaders> {
    let device_id = header_str(headers, DEVICE_ID_HEADER);
    let platform = header_str(headers, PLATFORM_HEADER);
    if device_id.is_none() && platform.is_none() {
        return None;
    }
    Some(DeviceHeaders {
        device_id: device_id.unwrap_or_default().to_string(),
        platform: platform.map(Platform::parse).unwrap_or_default(),
        app_version: header_str(headers, APP_VERSION_HEADER)
            .unwrap_or_default()
            .to_string(),
        device_model: header_str(headers, DEVICE_MODEL_HEADER)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Bearer token from the Authorization header, falling back to the web
/// app's auth cookie
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = header_str(headers, header::AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
