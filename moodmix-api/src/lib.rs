//! moodmix-api library
//!
//! Registers client apps, authenticates them by identifier, and proxies
//! Spotify recommendations on their behalf.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::services::MusicProvider;

/// Version prefix under which every route is also served
pub const API_V1_PREFIX: &str = "/api/v1";

/// Application state shared across HTTP handlers
///
/// Read-only after startup; the pool handles its own connection sharing.
#[derive(Clone)]
pub struct AppState {
    /// App record store
    pub db: SqlitePool,
    /// Recommendation provider
    pub provider: Arc<dyn MusicProvider>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, provider: Arc<dyn MusicProvider>) -> Self {
        Self { db, provider }
    }
}

/// Build application router
///
/// Routes are served both unversioned and under [`API_V1_PREFIX`].
/// `/health` needs no credential.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a registered app identifier)
    let protected = Router::new()
        .route("/test", get(api::test_credential))
        .route("/recommend", get(api::recommend))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new().route("/register", post(api::register_app));

    let routes: Router<AppState> = Router::new().merge(protected).merge(public);

    Router::new()
        .merge(routes.clone())
        .nest(API_V1_PREFIX, routes)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
