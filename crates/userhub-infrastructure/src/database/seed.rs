//! Sample data for local development

use sqlx::SqlitePool;
use tracing::{error, info};
use userhub_core::error::DomainError;
use userhub_shared::AuditFields;

use super::db_error;

const SAMPLE_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin@example.com", "Admin User"),
    ("user1", "user1@example.com", "Test User 1"),
    ("user2", "user2@example.com", "Test User 2"),
];

const SAMPLE_GROUPS: &[(&str, &str)] = &[
    ("Administrators", "System administrators"),
    ("Users", "Regular users"),
];

/// (username, group name)
const SAMPLE_MEMBERSHIPS: &[(&str, &str)] = &[
    ("admin", "Administrators"),
    ("user1", "Users"),
    ("user2", "Users"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub groups: usize,
    pub memberships: usize,
}

/// Insert the sample users, groups, and memberships in one transaction.
///
/// Nothing is written if any insert fails, e.g. because the sample usernames
/// already exist.
pub async fn seed(pool: &SqlitePool) -> Result<SeedSummary, DomainError> {
    info!("Adding sample data");

    let result = insert_samples(pool).await;
    match &result {
        Ok(summary) => info!("Sample data added: {:?}", summary),
        Err(e) => error!("Adding sample data failed, rolled back: {}", e),
    }
    result
}

async fn insert_samples(pool: &SqlitePool) -> Result<SeedSummary, DomainError> {
    let audit = AuditFields::now();
    let mut tx = pool.begin().await.map_err(db_error("starting seed transaction"))?;

    for (username, email, full_name) in SAMPLE_USERS {
        sqlx::query(
            r#"
            INSERT INTO users (username, email, full_name, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            "#
        )
        .bind(*username)
        .bind(*email)
        .bind(*full_name)
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("seeding user"))?;
    }

    for (name, description) in SAMPLE_GROUPS {
        sqlx::query(
            r#"
            INSERT INTO "groups" (name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(*name)
        .bind(*description)
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("seeding group"))?;
    }

    for (username, group) in SAMPLE_MEMBERSHIPS {
        sqlx::query(
            r#"
            INSERT INTO user_group (user_id, group_id)
            SELECT u.id, g.id FROM users u, "groups" g
            WHERE u.username = ? AND g.name = ?
            "#
        )
        .bind(*username)
        .bind(*group)
        .execute(&mut *tx)
        .await
        .map_err(db_error("seeding membership"))?;
    }

    tx.commit().await.map_err(db_error("committing seed"))?;

    Ok(SeedSummary {
        users: SAMPLE_USERS.len(),
        groups: SAMPLE_GROUPS.len(),
        memberships: SAMPLE_MEMBERSHIPS.len(),
    })
}
