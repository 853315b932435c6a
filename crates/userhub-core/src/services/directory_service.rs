// ============================================================================
// UserHub Core - Directory Service
// File: crates/userhub-core/src/services/directory_service.rs
// ============================================================================
//! User and group directory: creation, lookup, listing, and membership

use std::sync::Arc;
use tracing::{info, warn};
use userhub_shared::utils::mask_email;
use userhub_shared::{EntityId, Pagination};

use crate::domain::{Group, Membership, NewGroup, NewUser, User};
use crate::error::DomainError;
use crate::repositories::{GroupRepository, MembershipRepository, UserRepository};

/// Directory service shared by every HTTP handler
#[derive(Clone)]
pub struct DirectoryService {
    user_repo: Arc<dyn UserRepository>,
    group_repo: Arc<dyn GroupRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
}

impl DirectoryService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        group_repo: Arc<dyn GroupRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
    ) -> Self {
        Self {
            user_repo,
            group_repo,
            membership_repo,
        }
    }

    /// Create a user; the new user belongs to no group yet
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<UserWithGroups, DomainError> {
        let new_user = NewUser::new(
            username.to_string(),
            email.to_string(),
            full_name.map(str::to_string),
        )?;

        let user = self.user_repo.create(&new_user).await.map_err(|e| {
            if e.is_uniqueness_violation() {
                warn!("User creation rejected for {}: {}", mask_email(email), e);
            }
            e
        })?;

        info!("User created: id={} username={}", user.id, user.username);
        Ok(UserWithGroups { user, groups: Vec::new() })
    }

    pub async fn get_user(&self, id: EntityId) -> Result<UserWithGroups, DomainError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.attach_groups(user).await
    }

    pub async fn list_users(&self, page: Pagination) -> Result<Vec<UserWithGroups>, DomainError> {
        let users = self.user_repo.list(page).await?;
        let mut result = Vec::with_capacity(users.len());
        for user in users {
            result.push(self.attach_groups(user).await?);
        }
        Ok(result)
    }

    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<GroupWithUsers, DomainError> {
        let new_group = NewGroup::new(name.to_string(), description.map(str::to_string))?;

        let group = self.group_repo.create(&new_group).await.map_err(|e| {
            if e.is_uniqueness_violation() {
                warn!("Group creation rejected: {}", e);
            }
            e
        })?;

        info!("Group created: id={} name={}", group.id, group.name);
        Ok(GroupWithUsers { group, users: Vec::new() })
    }

    pub async fn get_group(&self, id: EntityId) -> Result<GroupWithUsers, DomainError> {
        let group = self
            .group_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::GroupNotFound)?;
        self.attach_users(group).await
    }

    pub async fn list_groups(&self, page: Pagination) -> Result<Vec<GroupWithUsers>, DomainError> {
        let groups = self.group_repo.list(page).await?;
        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            result.push(self.attach_users(group).await?);
        }
        Ok(result)
    }

    /// Add a user to a group
    ///
    /// Repeating the call for the same pair succeeds again and records
    /// another join row.
    pub async fn add_user_to_group(
        &self,
        user_id: EntityId,
        group_id: EntityId,
    ) -> Result<(), DomainError> {
        self.membership_repo
            .add(Membership::new(user_id, group_id))
            .await?;

        info!("User {} added to group {}", user_id, group_id);
        Ok(())
    }

    async fn attach_groups(&self, user: User) -> Result<UserWithGroups, DomainError> {
        let groups = self.membership_repo.group_names_for_user(user.id).await?;
        Ok(UserWithGroups { user, groups })
    }

    async fn attach_users(&self, group: Group) -> Result<GroupWithUsers, DomainError> {
        let users = self.membership_repo.usernames_for_group(group.id).await?;
        Ok(GroupWithUsers { group, users })
    }
}

/// User together with the names of its groups
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithGroups {
    pub user: User,
    pub groups: Vec<String>,
}

/// Group together with the usernames of its members
#[derive(Debug, Clone, PartialEq)]
pub struct GroupWithUsers {
    pub group: Group,
    pub users: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockGroupRepository, MockMembershipRepository, MockUserRepository};
    use mockall::predicate::eq;
    use userhub_shared::AuditFields;

    fn user(id: EntityId, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: None,
            is_active: true,
            audit: AuditFields::now(),
        }
    }

    fn service(
        users: MockUserRepository,
        groups: MockGroupRepository,
        memberships: MockMembershipRepository,
    ) -> DirectoryService {
        DirectoryService::new(Arc::new(users), Arc::new(groups), Arc::new(memberships))
    }

    #[tokio::test]
    async fn test_create_user_validates_before_store() {
        let mut users = MockUserRepository::new();
        users.expect_create().never();

        let svc = service(users, MockGroupRepository::new(), MockMembershipRepository::new());
        let result = svc.create_user("alice", "bogus", None).await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_user_passes_through_uniqueness_violation() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .times(1)
            .returning(|u| Err(DomainError::UsernameAlreadyExists(u.username.clone())));

        let svc = service(users, MockGroupRepository::new(), MockMembershipRepository::new());
        let result = svc.create_user("alice", "alice@example.com", None).await;

        assert_eq!(result, Err(DomainError::UsernameAlreadyExists("alice".to_string())));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let svc = service(users, MockGroupRepository::new(), MockMembershipRepository::new());

        assert_eq!(svc.get_user(42).await, Err(DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_user_attaches_groups() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(1)).returning(|id| Ok(Some(user(id, "alice"))));
        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_group_names_for_user()
            .with(eq(1))
            .returning(|_| Ok(vec!["Administrators".to_string()]));

        let svc = service(users, MockGroupRepository::new(), memberships);
        let found = svc.get_user(1).await.unwrap();

        assert_eq!(found.user.username, "alice");
        assert_eq!(found.groups, vec!["Administrators".to_string()]);
    }

    #[tokio::test]
    async fn test_add_user_to_group_propagates_not_found() {
        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_add()
            .with(eq(Membership::new(1, 99)))
            .times(1)
            .returning(|_| Err(DomainError::GroupNotFound));

        let svc = service(MockUserRepository::new(), MockGroupRepository::new(), memberships);

        assert_eq!(svc.add_user_to_group(1, 99).await, Err(DomainError::GroupNotFound));
    }

    #[tokio::test]
    async fn test_list_groups_passes_page_through() {
        let mut groups = MockGroupRepository::new();
        groups
            .expect_list()
            .with(eq(Pagination::new(10, 5)))
            .returning(|_| Ok(Vec::new()));

        let svc = service(MockUserRepository::new(), groups, MockMembershipRepository::new());

        assert!(svc.list_groups(Pagination::new(10, 5)).await.unwrap().is_empty());
    }
}
