//! Domain services (business logic)

pub mod directory_service;

pub use directory_service::{DirectoryService, GroupWithUsers, UserWithGroups};
