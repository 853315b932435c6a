// ============================================================================
// UserHub Core - User Entity
// File: crates/userhub-core/src/domain/user.rs
// ============================================================================

use serde::{Deserialize, Serialize};
use userhub_shared::{AuditFields, EntityId};
use validator::Validate;

/// Persisted user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,

    #[serde(flatten)]
    pub audit: AuditFields,
}

/// Validated input for creating a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 255, message = "Full name too long"))]
    pub full_name: Option<String>,
}

impl NewUser {
    pub fn new(
        username: String,
        email: String,
        full_name: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            full_name: full_name.map(|n| n.trim().to_string()),
        };

        user.validate()?;
        Ok(user)
    }
}
