//! Music provider seam
//!
//! The recommendation handler talks to the provider only through
//! [`MusicProvider`], so tests can substitute a stub for the network client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Energy used when the caller does not supply one
pub const DEFAULT_ENERGY: f64 = 0.5;

/// Genre seed used when the caller does not supply one
pub const DEFAULT_GENRES: &str = "rock";

/// Popularity target sent with every recommendation query
pub const TARGET_POPULARITY: u8 = 90;

/// Provider client errors
///
/// Every variant is terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure (DNS, connect, TLS, body read)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Outbound call exceeded the configured timeout
    #[error("Request to {0} timed out")]
    Timeout(&'static str),

    /// Provider answered with a non-success status
    #[error("{stage} API error {status}: {body}")]
    ApiError {
        stage: &'static str,
        status: u16,
        body: String,
    },

    /// Provider payload did not match the documented contract
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Caller-tunable recommendation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationParams {
    /// Target energy, 0.0-1.0
    pub energy: f64,
    /// Comma-separated genre seeds
    pub genres: String,
}

impl Default for RecommendationParams {
    fn default() -> Self {
        Self {
            energy: DEFAULT_ENERGY,
            genres: DEFAULT_GENRES.to_string(),
        }
    }
}

/// Album artwork entry, passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Simplified track returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    pub album: String,
    /// First credited artist only
    pub artist: String,
    pub images: Vec<TrackImage>,
    pub href: Option<String>,
    pub external_url: Option<String>,
}

/// External recommendation provider
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Exchange the configured refresh token for a short-lived access token
    async fn refresh_access_token(&self) -> Result<String, ProviderError>;

    /// Fetch recommendations using a token from [`Self::refresh_access_token`]
    async fn recommend(
        &self,
        access_token: &str,
        params: &RecommendationParams,
    ) -> Result<Vec<Track>, ProviderError>;
}
