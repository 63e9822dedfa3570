//! App record queries

use crate::db::models::AppRecord;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

type AppRow = (String, String, String, String);

/// Insert a new app and return the stored record
///
/// The identifier is generated here, never by the caller. Name and author
/// must be non-empty after trimming.
pub async fn create_app(pool: &SqlitePool, name: &str, author: &str) -> Result<AppRecord> {
    let name = name.trim();
    let author = author.trim();

    if name.is_empty() || author.is_empty() {
        return Err(Error::InvalidInput(
            "App name and author must be non-empty".to_string(),
        ));
    }

    let record = AppRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        author: author.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO apps (guid, name, author, created_at) VALUES (?, ?, ?, ?)")
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(&record.author)
        .bind(record.created_at.to_rfc3339())
        .execute(pool)
        .await?;

    debug!(app_id = %record.id, "App record created");

    Ok(record)
}

/// Look up an app by identifier
///
/// Returns `Ok(None)` when no app carries this identifier.
pub async fn find_app_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<AppRecord>> {
    let row = sqlx::query_as::<_, AppRow>(
        "SELECT guid, name, author, created_at FROM apps WHERE guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_record).transpose()
}

/// Number of registered apps
pub async fn count_apps(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM apps")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn row_to_record((guid, name, author, created_at): AppRow) -> Result<AppRecord> {
    let id = Uuid::parse_str(&guid)
        .map_err(|e| Error::Internal(format!("Corrupt app guid {:?}: {}", guid, e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Corrupt created_at for app {}: {}", guid, e)))?
        .with_timezone(&Utc);

    Ok(AppRecord {
        id,
        name,
        author,
        created_at,
    })
}
