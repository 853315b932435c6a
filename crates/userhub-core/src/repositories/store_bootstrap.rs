//! Store bootstrap trait (port)
//!
//! Lets the replication lifecycle decide whether the local store file needs a
//! fresh schema without knowing which database backs it.

use std::path::Path;

use async_trait::async_trait;
use crate::error::DomainError;

#[async_trait]
pub trait StoreBootstrap: Send + Sync {
    fn store_path(&self) -> &Path;

    fn store_exists(&self) -> bool {
        self.store_path().exists()
    }

    /// Creates the store file if needed and every table in it. Idempotent.
    async fn create_schema(&self) -> Result<(), DomainError>;
}
