//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Group not found")]
    GroupNotFound,

    #[error("Username already registered: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already registered: {0}")]
    EmailAlreadyExists(String),

    #[error("Group name already exists: {0}")]
    GroupNameAlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::UserNotFound | DomainError::GroupNotFound)
    }

    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            DomainError::UsernameAlreadyExists(_)
                | DomainError::EmailAlreadyExists(_)
                | DomainError::GroupNameAlreadyExists(_)
        )
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
