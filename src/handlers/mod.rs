// handlers/mod.rs - HTTP surface of the gateway
//
// Public (no account required) → Protected (account required, checked by
// the access layer and the role policies).
//
// Every route runs behind the request context middleware, which resolves the
// caller and inserts the `RequestContext` and the `ResourceAccessor` to use.
pub mod protected;
pub mod public;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::middleware::request_context_middleware;
use crate::ral::ResourceAccessor;

/// Shared by every request
#[derive(Clone)]
pub struct AppState {
    pub ral: ResourceAccessor,
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<AppConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(account_routes())
        .merge(thread_routes())
        .merge(visit_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_context_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
}

fn account_routes() -> Router<AppState> {
    Router::new().route("/api/accounts/:id", get(protected::accounts::account_get))
}

fn thread_routes() -> Router<AppState> {
    use protected::threads;

    Router::new()
        .route("/api/threads/:id", get(threads::thread_get))
        .route("/api/threads/:id/messages", post(threads::message_post))
        .route(
            "/api/threads/:id/scheduled_messages",
            post(threads::scheduled_message_post),
        )
}

fn visit_routes() -> Router<AppState> {
    Router::new().route(
        "/api/visits/:id/submit",
        post(protected::visits::visit_submit),
    )
}
