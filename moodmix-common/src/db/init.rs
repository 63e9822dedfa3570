//! Database initialization
//!
//! Opens the SQLite pool and creates the schema on first run. A failure here
//! is fatal for the service: it must not accept traffic without a live store.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Maximum pooled connections
const MAX_CONNECTIONS: u32 = 10;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open the database at `database_url` and create tables if needed
///
/// Accepts any sqlx SQLite URL (`sqlite://path/to.db`, `sqlite::memory:`).
/// Missing database files are created.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| Error::Config(format!("Invalid database URL {}: {}", database_url, e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    // WAL allows concurrent readers alongside the single writer; in-memory
    // databases cannot use it.
    let options = if is_memory_url(database_url) {
        options
    } else {
        options.journal_mode(SqliteJournalMode::Wal)
    };

    // An in-memory database lives and dies with its connection, so keep
    // exactly one open for the lifetime of the pool.
    let pool_options = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Opened database: {}", database_url);

    create_apps_table(&pool).await?;

    Ok(pool)
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the apps table
///
/// One flat record per registered client app.
pub async fn create_apps_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS apps (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            author TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
