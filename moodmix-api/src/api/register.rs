//! App registration
//!
//! POST /register with `{name, author}`. No authentication required.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use moodmix_common::db::create_app;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Registration request body
///
/// Fields are untyped at the wire level so that a missing or non-string
/// field can be reported alongside whatever was supplied.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub app_id: Uuid,
}

/// A usable field is a non-blank string
fn present(field: &Option<Value>) -> Option<&str> {
    field
        .as_ref()
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// POST /register
pub async fn register_app(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<RegisterResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (Some(name), Some(author)) = (present(&request.name), present(&request.author)) else {
        return Err(ApiError::MissingFields {
            name: request.name.clone(),
            author: request.author.clone(),
        });
    };

    let app = create_app(&state.db, name, author).await?;

    info!(app_id = %app.id, app_name = %app.name, app_author = %app.author, "App registered");

    Ok(Json(RegisterResponse {
        message: "App created successfully.".to_string(),
        app_id: app.id,
    }))
}
