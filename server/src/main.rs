use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod code;
mod config;
mod error;
mod handlers;
mod models;
mod store;

use store::LinkStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    /// Every short code issued since start-up. Volatile; lost on restart.
    pub store: LinkStore,
    pub config: config::AppConfig,
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness probe — returns 200 OK with an empty body
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .route("/shorten", post(handlers::shorten::shorten))
        // Short-link redirect; static routes above take priority
        .route("/:code", get(handlers::redirect::redirect))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snaplink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting snaplink on {}", config.bind_addr());
    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!(
        "Short codes: {} characters, at most {} attempts per allocation",
        config.code_length,
        config.max_attempts
    );

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState {
        store: LinkStore::new(),
        config,
    });
    let app = build_router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
