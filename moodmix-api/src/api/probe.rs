//! Credential probe
//!
//! GET /test lets a client confirm its identifier is accepted.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AuthenticatedApp;

#[derive(Debug, Serialize, Deserialize)]
pub struct AppSummary {
    pub id: Uuid,
    pub name: String,
    pub author: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub message: String,
    pub app: AppSummary,
}

/// GET /test
pub async fn test_credential(
    Extension(AuthenticatedApp(app)): Extension<AuthenticatedApp>,
) -> Json<ProbeResponse> {
    Json(ProbeResponse {
        message: "OKAY".to_string(),
        app: AppSummary {
            id: app.id,
            name: app.name,
            author: app.author,
        },
    })
}
