//! Recommendation proxy
//!
//! GET /recommend?genres=<seeds>&energy=<0.0-1.0>
//!
//! Stages run strictly in order and the first failure ends the request:
//! auth (middleware) -> token refresh -> recommendation query -> response.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::AuthenticatedApp;
use crate::error::{ApiError, ApiResult};
use crate::services::{RecommendationParams, Track, DEFAULT_ENERGY, DEFAULT_GENRES};
use crate::AppState;

/// Query parameters for GET /recommend
#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub energy: Option<f64>,
    pub genres: Option<String>,
}

impl RecommendQuery {
    /// Apply defaults for absent parameters and validate present ones
    pub fn resolve(self) -> ApiResult<RecommendationParams> {
        let energy = self.energy.unwrap_or(DEFAULT_ENERGY);
        if !(0.0..=1.0).contains(&energy) {
            return Err(ApiError::BadRequest(format!(
                "energy must be between 0.0 and 1.0, got {}",
                energy
            )));
        }

        let genres = match self.genres {
            None => DEFAULT_GENRES.to_string(),
            Some(genres) if genres.trim().is_empty() => {
                return Err(ApiError::BadRequest("genres must not be empty".to_string()))
            }
            Some(genres) => genres.trim().to_string(),
        };

        Ok(RecommendationParams { energy, genres })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub playlist: Vec<Track>,
    pub energy: f64,
    pub genres: String,
}

/// GET /recommend
pub async fn recommend(
    State(state): State<AppState>,
    Extension(AuthenticatedApp(app)): Extension<AuthenticatedApp>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let params = query.resolve()?;

    let access_token = state.provider.refresh_access_token().await?;
    let playlist = state.provider.recommend(&access_token, &params).await?;

    info!(
        app_id = %app.id,
        energy = params.energy,
        genres = %params.genres,
        tracks = playlist.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendResponse {
        playlist,
        energy: params.energy,
        genres: params.genres,
    }))
}
