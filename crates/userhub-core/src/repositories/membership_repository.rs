//! Membership repository trait (port)

use async_trait::async_trait;
use userhub_shared::EntityId;
use crate::domain::Membership;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Inserts a join row.
    ///
    /// Returns `UserNotFound` / `GroupNotFound` without writing anything when
    /// either side does not resolve. Existing identical pairs are not checked.
    async fn add(&self, membership: Membership) -> Result<(), DomainError>;
    async fn group_names_for_user(&self, user_id: EntityId) -> Result<Vec<String>, DomainError>;
    async fn usernames_for_group(&self, group_id: EntityId) -> Result<Vec<String>, DomainError>;
    /// Raw number of join rows for the pair, duplicates included.
    async fn count(&self, membership: Membership) -> Result<i64, DomainError>;
}
