//! Spotify Web API client
//!
//! Two calls per recommendation request, always in this order:
//! 1. `POST {accounts}/api/token` (refresh-token grant, HTTP Basic client auth)
//! 2. `GET {api}/v1/recommendations` (bearer access token)
//!
//! Tokens are never cached; each recommendation performs a fresh refresh.

use async_trait::async_trait;
use moodmix_common::config::{ProviderCredentials, SpotifyTomlConfig, DEFAULT_PROVIDER_TIMEOUT_SECS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{
    MusicProvider, ProviderError, RecommendationParams, Track, TrackImage, TARGET_POPULARITY,
};

pub const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com";
const USER_AGENT: &str = concat!("moodmix/", env!("CARGO_PKG_VERSION"));

/// Endpoint and timeout settings for [`SpotifyClient`]
#[derive(Debug, Clone)]
pub struct SpotifyClientConfig {
    pub accounts_url: String,
    pub api_url: String,
    /// Applies to each outbound call separately
    pub timeout: Duration,
}

impl Default for SpotifyClientConfig {
    fn default() -> Self {
        Self {
            accounts_url: SPOTIFY_ACCOUNTS_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl SpotifyClientConfig {
    /// Apply `[spotify]` TOML overrides on top of the defaults
    pub fn from_toml(toml: &SpotifyTomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            accounts_url: toml.accounts_url.clone().unwrap_or(defaults.accounts_url),
            api_url: toml.api_url.clone().unwrap_or(defaults.api_url),
            timeout: toml
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Recommendations endpoint response (only the fields we project)
#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    name: String,
    album: SpotifyAlbum,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    href: Option<String>,
    #[serde(default)]
    external_urls: SpotifyExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    images: Vec<TrackImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct SpotifyExternalUrls {
    spotify: Option<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Self {
            name: track.name,
            album: track.album.name,
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            images: track.album.images,
            href: track.href,
            external_url: track.external_urls.spotify,
        }
    }
}

/// Spotify API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    credentials: ProviderCredentials,
    config: SpotifyClientConfig,
}

impl SpotifyClient {
    /// Create new Spotify client
    pub fn new(
        credentials: ProviderCredentials,
        config: SpotifyClientConfig,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            credentials,
            config,
        })
    }

    fn token_url(&self) -> String {
        format!("{}/api/token", self.config.accounts_url.trim_end_matches('/'))
    }

    fn recommendations_url(&self) -> String {
        format!("{}/v1/recommendations", self.config.api_url.trim_end_matches('/'))
    }
}

fn transport_error(stage: &'static str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(stage)
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

async fn check_status(
    stage: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError {
        stage,
        status: status.as_u16(),
        body,
    })
}

/// Read a success body as JSON
///
/// Only a body that arrived but does not decode is a parse error; a body read
/// that stalls or drops is a transport failure.
async fn read_json<T: DeserializeOwned>(
    stage: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    response.json().await.map_err(|e| {
        if e.is_decode() {
            ProviderError::ParseError(e.to_string())
        } else {
            transport_error(stage, e)
        }
    })
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    async fn refresh_access_token(&self) -> Result<String, ProviderError> {
        const STAGE: &str = "token";

        tracing::debug!(url = %self.token_url(), "Refreshing Spotify access token");

        let response = self
            .http_client
            .post(self.token_url())
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(STAGE, e))?;

        let token: TokenResponse = read_json(STAGE, check_status(STAGE, response).await?).await?;

        if token.access_token.trim().is_empty() {
            return Err(ProviderError::ParseError(
                "Token response carried an empty access_token".to_string(),
            ));
        }

        Ok(token.access_token)
    }

    async fn recommend(
        &self,
        access_token: &str,
        params: &RecommendationParams,
    ) -> Result<Vec<Track>, ProviderError> {
        const STAGE: &str = "recommendations";

        tracing::debug!(
            energy = params.energy,
            genres = %params.genres,
            "Querying Spotify recommendations"
        );

        let response = self
            .http_client
            .get(self.recommendations_url())
            .bearer_auth(access_token)
            .query(&[
                ("target_popularity", TARGET_POPULARITY.to_string()),
                ("target_energy", params.energy.to_string()),
                ("seed_genres", params.genres.clone()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(STAGE, e))?;

        let recommendations: RecommendationsResponse =
            read_json(STAGE, check_status(STAGE, response).await?).await?;

        tracing::info!(
            tracks = recommendations.tracks.len(),
            "Spotify recommendations received"
        );

        Ok(recommendations.tracks.into_iter().map(Track::from).collect())
    }
}
