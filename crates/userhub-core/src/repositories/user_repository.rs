//! User repository trait (port)

use async_trait::async_trait;
use userhub_shared::{EntityId, Pagination};
use crate::domain::{NewUser, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError>;
    /// Users ordered by insertion, windowed by `page`.
    async fn list(&self, page: Pagination) -> Result<Vec<User>, DomainError>;
    /// Fails with `UsernameAlreadyExists` or `EmailAlreadyExists` on collision.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}
