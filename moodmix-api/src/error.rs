//! Error types for moodmix-api
//!
//! Every 500-class error answers with the same user-safe message. The
//! underlying detail goes to the log, never to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::ProviderError;

/// Message returned for every internal or upstream failure
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, try again shortly.";

/// Message returned when the request carries no credential
pub const MISSING_CREDENTIAL_MESSAGE: &str = "No Authorization token sent.";

/// Message returned when the credential does not name a registered app
pub const UNKNOWN_APP_MESSAGE: &str = "No App with this ID has been registered.";

/// Message returned when registration omits a required field
pub const MISSING_FIELDS_MESSAGE: &str = "Some fields are missing.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Registration without both name and author (400)
    ///
    /// Echoes back whatever the caller did supply.
    #[error("Missing fields (name: {name:?}, author: {author:?})")]
    MissingFields {
        name: Option<serde_json::Value>,
        author: Option<serde_json::Value>,
    },

    /// Missing or unknown credential (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Store or other internal failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Provider failure (500)
    #[error("Upstream error: {0}")]
    Upstream(#[from] ProviderError),
}

impl From<moodmix_common::Error> for ApiError {
    fn from(err: moodmix_common::Error) -> Self {
        match err {
            moodmix_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::MissingFields { name, author } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": MISSING_FIELDS_MESSAGE,
                    "appName": name,
                    "appAuthor": author,
                })),
            )
                .into_response(),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(ref detail) => {
                error!("Internal error: {}", detail);
                generic_failure()
            }
            ApiError::Upstream(ref err) => {
                error!("Provider error: {}", err);
                generic_failure()
            }
        }
    }
}

fn generic_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": GENERIC_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
