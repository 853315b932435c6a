// ============================================================================
// UserHub Infrastructure - SQLite User Repository
// File: crates/userhub-infrastructure/src/database/sqlite/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{error, info};

use userhub_core::domain::{NewUser, User};
use userhub_core::error::DomainError;
use userhub_core::repositories::UserRepository;
use userhub_shared::{AuditFields, EntityId, Pagination};

use super::unique_violation_column;
use crate::database::db_error;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            is_active: row.is_active,
            audit: AuditFields {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, full_name, is_active, created_at, updated_at
            FROM users
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, full_name, is_active, created_at, updated_at
            FROM users
            ORDER BY id
            LIMIT ? OFFSET ?
            "#
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing users"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let audit = AuditFields::now();

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, full_name, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            RETURNING id, username, email, full_name, is_active, created_at, updated_at
            "#
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| match unique_violation_column(&e).as_deref() {
            Some("users.email") => DomainError::EmailAlreadyExists(user.email.clone()),
            Some("users.username") => DomainError::UsernameAlreadyExists(user.username.clone()),
            _ => {
                error!("Database error creating user: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        info!("User row inserted: {}", row.id);
        Ok(row.into())
    }
}
