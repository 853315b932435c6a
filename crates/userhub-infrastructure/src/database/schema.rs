//! Schema management for the store file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{info, warn};
use userhub_core::error::DomainError;
use userhub_core::repositories::StoreBootstrap;
use userhub_shared::config::DatabaseSettings;

use super::connection::create_pool;
use super::db_error;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "groups" (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    // No UNIQUE(user_id, group_id): duplicate pairs are accepted.
    r#"
    CREATE TABLE IF NOT EXISTS user_group (
        user_id INTEGER REFERENCES users(id),
        group_id INTEGER REFERENCES "groups"(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_users_username ON users (username)",
    "CREATE INDEX IF NOT EXISTS ix_users_email ON users (email)",
    r#"CREATE INDEX IF NOT EXISTS ix_groups_name ON "groups" (name)"#,
    "CREATE INDEX IF NOT EXISTS ix_user_group_user_id ON user_group (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_user_group_group_id ON user_group (group_id)",
];

const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS user_group",
    "DROP TABLE IF EXISTS users",
    r#"DROP TABLE IF EXISTS "groups""#,
];

/// Create every table and index that is missing.
pub async fn create_all(pool: &SqlitePool) -> Result<(), DomainError> {
    let mut tx = pool.begin().await.map_err(db_error("starting schema transaction"))?;
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(db_error("creating schema"))?;
    }
    tx.commit().await.map_err(db_error("committing schema"))?;
    Ok(())
}

/// Drop every table. All data is lost.
pub async fn drop_all(pool: &SqlitePool) -> Result<(), DomainError> {
    warn!("Dropping all tables");
    let mut tx = pool.begin().await.map_err(db_error("starting drop transaction"))?;
    for statement in DROP_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(db_error("dropping schema"))?;
    }
    tx.commit().await.map_err(db_error("committing drop"))?;
    Ok(())
}

/// The local SQLite file, as seen by the startup lifecycle
pub struct SqliteStore {
    settings: DatabaseSettings,
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        let path = settings.file_path();
        Self { settings, path }
    }
}

#[async_trait]
impl StoreBootstrap for SqliteStore {
    fn store_path(&self) -> &Path {
        &self.path
    }

    async fn create_schema(&self) -> Result<(), DomainError> {
        info!("Creating database schema at {}", self.path.display());

        let pool = create_pool(&DatabaseSettings {
            max_connections: 1,
            ..self.settings.clone()
        })
        .await
        .map_err(db_error("opening store"))?;

        let result = create_all(&pool).await;
        pool.close().await;
        result?;

        info!("Database schema created");
        Ok(())
    }
}
