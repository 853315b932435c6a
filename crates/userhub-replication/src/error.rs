//! Replication errors

use std::io;

use thiserror::Error;
use userhub_core::error::DomainError;

#[derive(Error, Debug)]
pub enum ReplicationError {
    #[error("Restore exited unsuccessfully (exit code {code:?})")]
    RestoreFailed { code: Option<i32> },

    #[error("Failed to launch replication binary: {0}")]
    Spawn(#[source] io::Error),

    #[error("Failed to signal replication process: {0}")]
    Signal(#[source] io::Error),

    #[error("Store initialisation failed: {0}")]
    Store(#[from] DomainError),
}
