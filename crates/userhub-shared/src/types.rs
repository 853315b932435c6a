//! Common types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row identifier assigned by the store, increasing in insertion order.
pub type EntityId = i64;

/// Offset/limit window used by list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: super::constants::DEFAULT_SKIP,
            limit: super::constants::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditFields {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self::now()
    }
}
