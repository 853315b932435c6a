//! SQLite repository implementations

pub mod user_repo_impl;
pub mod group_repo_impl;
pub mod membership_repo_impl;

pub use user_repo_impl::SqliteUserRepository;
pub use group_repo_impl::SqliteGroupRepository;
pub use membership_repo_impl::SqliteMembershipRepository;

/// SQLite reports unique violations as `UNIQUE constraint failed: table.column`;
/// returns the `table.column` part.
pub(crate) fn unique_violation_column(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err
            .message()
            .rsplit(": ")
            .next()
            .map(|column| column.trim().to_string()),
        _ => None,
    }
}
