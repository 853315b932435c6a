//! Group repository trait (port)

use async_trait::async_trait;
use userhub_shared::{EntityId, Pagination};
use crate::domain::{Group, NewGroup};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Group>, DomainError>;
    async fn list(&self, page: Pagination) -> Result<Vec<Group>, DomainError>;
    async fn create(&self, group: &NewGroup) -> Result<Group, DomainError>;
}
