// ============================================================================
// UserHub Infrastructure - SQLite Membership Repository
// File: crates/userhub-infrastructure/src/database/sqlite/membership_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use userhub_core::domain::Membership;
use userhub_core::error::DomainError;
use userhub_core::repositories::MembershipRepository;
use userhub_shared::EntityId;

use crate::database::db_error;

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn add(&self, membership: Membership) -> Result<(), DomainError> {
        // IMMEDIATE takes the write lock before the existence reads, so a
        // concurrent writer makes us wait on busy_timeout instead of failing
        // the read-to-write upgrade with SQLITE_BUSY.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(db_error("starting membership transaction"))?;

        let user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(membership.user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("resolving membership user"))?;
        if user.is_none() {
            return Err(DomainError::UserNotFound);
        }

        let group: Option<i64> = sqlx::query_scalar(r#"SELECT id FROM "groups" WHERE id = ?"#)
            .bind(membership.group_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("resolving membership group"))?;
        if group.is_none() {
            return Err(DomainError::GroupNotFound);
        }

        sqlx::query("INSERT INTO user_group (user_id, group_id) VALUES (?, ?)")
            .bind(membership.user_id)
            .bind(membership.group_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("inserting membership"))?;

        tx.commit().await.map_err(db_error("committing membership"))?;

        debug!("Membership row inserted: {:?}", membership);
        Ok(())
    }

    async fn group_names_for_user(&self, user_id: EntityId) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT name FROM "groups"
            WHERE id IN (SELECT group_id FROM user_group WHERE user_id = ?)
            ORDER BY id
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing groups of user"))
    }

    async fn usernames_for_group(&self, group_id: EntityId) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT username FROM users
            WHERE id IN (SELECT user_id FROM user_group WHERE group_id = ?)
            ORDER BY id
            "#
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing members of group"))
    }

    async fn count(&self, membership: Membership) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_group WHERE user_id = ? AND group_id = ?")
            .bind(membership.user_id)
            .bind(membership.group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("counting membership rows"))
    }
}
