//! Tradotto — request language negotiation for multilingual page serving.

mod config;
mod error;
mod middleware;
mod models;
mod registry;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, "configuration loaded");

    let state = AppState::new(&config).context("failed to initialize application state")?;

    // Middleware layers (last added = first executed in request flow):
    // TraceLayer → language negotiation → routes
    let app = Router::new()
        .merge(routes::front::router())
        .merge(routes::health::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::language::negotiate_language,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
