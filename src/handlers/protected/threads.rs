use axum::extract::{Extension, Json, Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_message_text;
use crate::context::RequestContext;
use crate::deeplink;
use crate::dispatch::{MessagePosted, ScheduledMessageUpdated};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy;
use crate::ral::ResourceAccessor;
use crate::services::threading::{
    Attachment, CreateScheduledMessageRequest, MessagePost, PostMessageRequest,
    PostMessageResponse, ScheduledMessage, Thread,
};

#[derive(Debug, Default, Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub viewer_entity_id: String,
}

#[derive(Debug, Serialize)]
pub struct ThreadView {
    #[serde(flatten)]
    pub thread: Thread,
    /// Link that opens the thread in the web app
    pub url: String,
}

/// GET /api/threads/:id
pub async fn thread_get(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(ral): Extension<ResourceAccessor>,
    Path(id): Path<String>,
    Query(query): Query<ThreadQuery>,
) -> ApiResult<ThreadView> {
    let thread = ral.thread(&ctx, &id, &query.viewer_entity_id).await?;
    let url = deeplink::thread_url_shareable(
        &state.config.web.domain,
        &thread.organization_id,
        &thread.id,
    );
    Ok(ApiResponse::success(ThreadView { thread, url }))
}

#[derive(Debug, Deserialize)]
pub struct PostMessageBody {
    pub from_entity_id: String,
    /// BML markup
    pub text: String,
    #[serde(default)]
    pub internal: bool,
    /// Idempotency key; generated when absent
    pub uuid: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// POST /api/threads/:id/messages
pub async fn message_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(ral): Extension<ResourceAccessor>,
    Path(id): Path<String>,
    Json(body): Json<PostMessageBody>,
) -> ApiResult<PostMessageResponse> {
    let bml = parse_message_text(&ctx, &body.text)?;
    let summary = bml.plain_text();

    let resp = ral
        .post_message(
            &ctx,
            PostMessageRequest {
                uuid: body.uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                thread_id: id.clone(),
                from_entity_id: body.from_entity_id.clone(),
                message: MessagePost {
                    text: bml.format(),
                    summary: summary.clone(),
                    internal: body.internal,
                    attachments: body.attachments,
                    ..Default::default()
                },
            },
        )
        .await?;

    state
        .dispatcher
        .publish_async(MessagePosted {
            thread_id: id,
            item_id: resp.item.as_ref().map(|item| item.id.clone()).unwrap_or_default(),
            organization_id: resp
                .thread
                .as_ref()
                .map(|thread| thread.organization_id.clone())
                .unwrap_or_default(),
            actor_entity_id: body.from_entity_id,
            summary,
            internal: body.internal,
        })
        .await;

    Ok(ApiResponse::created(resp))
}

#[derive(Debug, Deserialize)]
pub struct ScheduleMessageBody {
    pub actor_entity_id: String,
    pub scheduled_for: DateTime<Utc>,
    /// BML markup
    pub text: String,
    #[serde(default)]
    pub internal: bool,
}

/// POST /api/threads/:id/scheduled_messages - providers only
pub async fn scheduled_message_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(ral): Extension<ResourceAccessor>,
    Path(id): Path<String>,
    Json(body): Json<ScheduleMessageBody>,
) -> ApiResult<ScheduledMessage> {
    let (ctx, ral) = (&ctx, &ral);
    let scheduled = policy::provider(ctx, move |_| async move {
        let bml = parse_message_text(ctx, &body.text)?;
        ral.create_scheduled_message(
            ctx,
            CreateScheduledMessageRequest {
                thread_id: id,
                actor_entity_id: body.actor_entity_id,
                scheduled_for: body.scheduled_for,
                content: MessagePost {
                    text: bml.format(),
                    summary: bml.plain_text(),
                    internal: body.internal,
                    ..Default::default()
                },
            },
        )
        .await
    })
    .await?;

    state
        .dispatcher
        .publish_async(ScheduledMessageUpdated {
            scheduled_message_id: scheduled.id.clone(),
            thread_id: scheduled.thread_id.clone(),
            status: scheduled.status,
        })
        .await;

    Ok(ApiResponse::created(scheduled))
}
