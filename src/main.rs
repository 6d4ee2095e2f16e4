use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use care_gateway::config;
use care_gateway::dispatch::{subscribers, Dispatcher};
use care_gateway::handlers::{router, AppState};
use care_gateway::ral::ResourceAccessor;
use care_gateway::services::Clients;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up WEB_DOMAIN, *_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting care-gateway in {:?} mode", config.environment);

    let clients = Clients::from_config(&config.services)?;
    let ral = ResourceAccessor::new(clients);

    let dispatcher = Arc::new(Dispatcher::new(config.dispatch.mode));
    subscribers::register_analytics(&dispatcher);

    let app = router(AppState {
        ral,
        dispatcher,
        config: Arc::new(config.clone()),
    });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("care-gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
