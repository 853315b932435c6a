//! Request and response bodies

use serde::{Deserialize, Serialize};
use userhub_core::services::{GroupWithUsers, UserWithGroups};
use userhub_shared::constants::{DEFAULT_LIMIT, DEFAULT_SKIP};
use userhub_shared::{EntityId, Pagination};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

/// `?skip=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.skip.unwrap_or(DEFAULT_SKIP),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub groups: Vec<String>,
}

impl From<UserWithGroups> for UserResponse {
    fn from(value: UserWithGroups) -> Self {
        let UserWithGroups { user, groups } = value;
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            groups,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupResponse {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub users: Vec<String>,
}

impl From<GroupWithUsers> for GroupResponse {
    fn from(value: GroupWithUsers) -> Self {
        let GroupWithUsers { group, users } = value;
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            users,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the UNIX epoch.
    pub timestamp: f64,
}
