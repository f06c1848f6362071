use anyhow::{Context, Result};
use dotenv::dotenv;
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use tokio::net::TcpListener;

mod api;
mod config;
mod services;
mod types;

use crate::api::routes::create_router;
use crate::api::state::AppState;
use crate::config::Config;
use crate::services::rpc::HeliusClient;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    let rpc_limiter = Arc::new(RateLimiter::direct(Quota::per_second(config.requests_per_second)));
    let source = HeliusClient::new(config.rpc_url.clone(), config.request_timeout, rpc_limiter)
        .context("Failed to build RPC client")?;

    tracing::info!(
        "Page size {}, {:?} termination, {} excluded addresses, {}s request timeout",
        config.fetch.page_size,
        config.fetch.termination,
        config.excluded.len(),
        config.request_timeout.as_secs()
    );

    let state = AppState {
        source: Arc::new(source),
        excluded: Arc::new(config.excluded),
        fetch: config.fetch,
    };
    let app = create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve API: {:?}", e);
    }

    Ok(())
}
