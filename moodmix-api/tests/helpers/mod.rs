//! Shared test helpers for moodmix-api integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;

use moodmix_api::services::{MusicProvider, ProviderError, RecommendationParams, Track, TrackImage};
use moodmix_api::{build_router, AppState};
use moodmix_common::db::init_database;

/// How the stub behaves when refresh is called
#[derive(Clone, Copy, Debug)]
pub enum RefreshBehaviour {
    Succeed,
    Fail,
}

/// Provider stand-in that records how it was called
pub struct StubProvider {
    refresh: RefreshBehaviour,
    tracks: Option<Vec<Track>>,
    pub refresh_calls: AtomicUsize,
    pub recommend_calls: AtomicUsize,
    pub last_token: Mutex<Option<String>>,
    pub last_params: Mutex<Option<RecommendationParams>>,
}

impl StubProvider {
    /// Refresh succeeds and recommend returns `tracks`
    pub fn returning(tracks: Vec<Track>) -> Arc<Self> {
        Arc::new(Self {
            refresh: RefreshBehaviour::Succeed,
            tracks: Some(tracks),
            refresh_calls: AtomicUsize::new(0),
            recommend_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_params: Mutex::new(None),
        })
    }

    /// Refresh fails
    pub fn failing_refresh() -> Arc<Self> {
        Arc::new(Self {
            refresh: RefreshBehaviour::Fail,
            tracks: Some(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            recommend_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_params: Mutex::new(None),
        })
    }

    /// Refresh succeeds, recommend fails
    pub fn failing_recommend() -> Arc<Self> {
        Arc::new(Self {
            refresh: RefreshBehaviour::Succeed,
            tracks: None,
            refresh_calls: AtomicUsize::new(0),
            recommend_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_params: Mutex::new(None),
        })
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn recommend_count(&self) -> usize {
        self.recommend_calls.load(Ordering::SeqCst)
    }
}

pub const STUB_ACCESS_TOKEN: &str = "stub-access-token";

#[async_trait]
impl MusicProvider for StubProvider {
    async fn refresh_access_token(&self) -> Result<String, ProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        match self.refresh {
            RefreshBehaviour::Succeed => Ok(STUB_ACCESS_TOKEN.to_string()),
            RefreshBehaviour::Fail => Err(ProviderError::ApiError {
                stage: "token",
                status: 400,
                body: r#"{"error":"invalid_grant"}"#.to_string(),
            }),
        }
    }

    async fn recommend(
        &self,
        access_token: &str,
        params: &RecommendationParams,
    ) -> Result<Vec<Track>, ProviderError> {
        self.recommend_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(access_token.to_string());
        *self.last_params.lock().unwrap() = Some(params.clone());

        self.tracks
            .clone()
            .ok_or_else(|| ProviderError::NetworkError("connection reset".to_string()))
    }
}

/// Build a track with a recognisable name
pub fn sample_track(n: usize) -> Track {
    Track {
        name: format!("Track {}", n),
        album: format!("Album {}", n),
        artist: format!("Artist {}", n),
        images: vec![TrackImage {
            url: format!("https://i.scdn.co/image/{}", n),
            height: Some(640),
            width: Some(640),
        }],
        href: Some(format!("https://api.spotify.com/v1/tracks/{}", n)),
        external_url: Some(format!("https://open.spotify.com/track/{}", n)),
    }
}

/// Fresh in-memory store
pub async fn test_db() -> SqlitePool {
    init_database("sqlite::memory:")
        .await
        .expect("Should open in-memory database")
}

/// Router over `db` using `provider`
pub fn test_app(db: SqlitePool, provider: Arc<dyn MusicProvider>) -> axum::Router {
    build_router(AppState::new(db, provider))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_credential(uri: &str, credential: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, credential)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as JSON
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Should read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
