//! moodmix-api - app registration and recommendation proxy
//!
//! Startup order: tracing -> `.env` (outside production) -> configuration ->
//! store -> provider client -> router -> listener. The store must be
//! reachable before the listener binds; otherwise the process exits non-zero.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodmix_api::config::{should_load_dotenv, Args, ServiceConfig, ENV_VAR};
use moodmix_api::services::SpotifyClient;
use moodmix_api::{build_router, AppState};
use moodmix_common::db::init_database;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodmix_api=info,moodmix_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification before anything that can block or fail
    info!(
        "Starting moodmix-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Must run before clap reads the environment
    if should_load_dotenv(std::env::var(ENV_VAR).ok().as_deref()) {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to load .env file: {}", e),
        }
    }

    let args = Args::parse();
    let config = ServiceConfig::from_args(&args).context("Failed to resolve configuration")?;

    let pool = match init_database(&config.database_url).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let provider = SpotifyClient::new(config.credentials.clone(), config.spotify.clone())
        .context("Failed to build Spotify client")?;
    info!(
        "Spotify client ready (timeout {:?} per call)",
        config.spotify.timeout
    );

    let state = AppState::new(pool.clone(), Arc::new(provider));
    let app = build_router(state);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("moodmix-api listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
