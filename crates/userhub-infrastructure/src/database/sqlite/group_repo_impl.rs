// ============================================================================
// UserHub Infrastructure - SQLite Group Repository
// File: crates/userhub-infrastructure/src/database/sqlite/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::error;

use userhub_core::domain::{Group, NewGroup};
use userhub_core::error::DomainError;
use userhub_core::repositories::GroupRepository;
use userhub_shared::{AuditFields, EntityId, Pagination};

use super::unique_violation_column;
use crate::database::db_error;

pub struct SqliteGroupRepository {
    pool: SqlitePool,
}

impl SqliteGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            description: row.description,
            audit: AuditFields {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Group>, DomainError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM "groups"
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding group by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Group>, DomainError> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM "groups"
            ORDER BY id
            LIMIT ? OFFSET ?
            "#
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing groups"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, group: &NewGroup) -> Result<Group, DomainError> {
        let audit = AuditFields::now();

        let row: GroupRow = sqlx::query_as(
            r#"
            INSERT INTO "groups" (name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, description, created_at, updated_at
            "#
        )
        .bind(&group.name)
        .bind(&group.description)
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            if unique_violation_column(&e).is_some() {
                DomainError::GroupNameAlreadyExists(group.name.clone())
            } else {
                error!("Database error creating group: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        Ok(row.into())
    }
}
