// ============================================================================
// UserHub Core - Group Entity
// File: crates/userhub-core/src/domain/group.rs
// ============================================================================

use serde::{Deserialize, Serialize};
use userhub_shared::{AuditFields, EntityId};
use validator::Validate;

/// Persisted group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,

    #[serde(flatten)]
    pub audit: AuditFields,
}

/// Validated input for creating a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewGroup {
    #[validate(length(min = 1, max = 150, message = "Group name must be between 1 and 150 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,
}

impl NewGroup {
    pub fn new(
        name: String,
        description: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
        };

        group.validate()?;
        Ok(group)
    }
}
