//! Authentication middleware for moodmix-api
//!
//! The credential is the app identifier itself, carried in the
//! `Authorization` header either raw or as `Bearer <id>`. It never expires.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use moodmix_common::db::{find_app_by_id, AppRecord};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, MISSING_CREDENTIAL_MESSAGE, UNKNOWN_APP_MESSAGE};
use crate::AppState;

/// The app resolved from the request credential
///
/// Inserted into request extensions by [`auth_middleware`]; handlers behind
/// the middleware read it with `Extension<AuthenticatedApp>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedApp(pub AppRecord);

/// Authentication middleware
///
/// Returns 401 for a missing, malformed, or unknown credential and 500 when
/// the store cannot be queried. Applied to protected routes only.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = credential_from_headers(request.headers())
        .ok_or(ApiError::Unauthorized(MISSING_CREDENTIAL_MESSAGE))?;

    // A string that cannot be an identifier cannot name a registered app
    let app_id = Uuid::parse_str(credential).map_err(|e| {
        debug!("Rejecting malformed credential: {}", e);
        ApiError::Unauthorized(UNKNOWN_APP_MESSAGE)
    })?;

    let app = find_app_by_id(&state.db, app_id)
        .await?
        .ok_or(ApiError::Unauthorized(UNKNOWN_APP_MESSAGE))?;

    debug!(app_id = %app.id, app_name = %app.name, "Request authenticated");
    request.extensions_mut().insert(AuthenticatedApp(app));

    Ok(next.run(request).await)
}

/// Extract the credential from the `Authorization` header
///
/// Returns `None` when the header is absent, blank, or not valid UTF-8.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

    let credential = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    (!credential.is_empty()).then_some(credential)
}
