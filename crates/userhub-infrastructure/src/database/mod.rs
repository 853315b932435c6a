//! Database module (SQLite adapters)

pub mod connection;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use connection::create_pool;
pub use schema::SqliteStore;
pub use sqlite::{SqliteGroupRepository, SqliteMembershipRepository, SqliteUserRepository};

use tracing::error;
use userhub_core::error::DomainError;

/// Logs a store failure and converts it to the domain error, tagged with
/// the operation that hit it.
pub(crate) fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", operation, e);
        DomainError::DatabaseError(e.to_string())
    }
}
