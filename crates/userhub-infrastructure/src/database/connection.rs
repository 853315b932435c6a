//! Database connection pool

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use userhub_shared::config::DatabaseSettings;

/// Connection options for the store file.
///
/// WAL journaling is required by the replication sidecar, which streams the
/// write-ahead log rather than the main database file.
pub fn connect_options(settings: &DatabaseSettings) -> Result<SqliteConnectOptions, sqlx::Error> {
    let mut options = SqliteConnectOptions::from_str(&settings.normalized_url())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if let Some(path) = &settings.path {
        options = options.filename(path);
    }

    Ok(options)
}

pub async fn create_pool(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(connect_options(settings)?)
        .await
}
