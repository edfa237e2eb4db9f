mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;

use std::sync::Arc;
use anyhow::Context;
use tracing_subscriber::EnvFilter;
use crate::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
    services::{CredentialStore, MemoryStore, PasswordService, RedisStore, TokenService, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("axum_todo=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Storage backend
    let store: Arc<dyn UserStore> = match config.store.backend {
        StoreBackend::Redis => Arc::new(
            RedisStore::connect(&config.redis.url)
                .await
                .context("Failed to connect to Redis")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    // Token signing
    let secret = config.jwt_secret().context("auth.jwt_secret is not set")?;
    let tokens = TokenService::new(secret, chrono::Duration::seconds(config.auth.token_ttl_secs))?;

    let state = AppState {
        credentials: CredentialStore::new(store, PasswordService::default()),
        tokens: Arc::new(tokens),
    };
    let app = build_router(state, config.server.max_body_size);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

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
