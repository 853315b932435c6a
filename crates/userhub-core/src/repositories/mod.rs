//! Repository traits (ports)

pub mod user_repository;
pub mod group_repository;
pub mod membership_repository;
pub mod store_bootstrap;

pub use user_repository::UserRepository;
pub use group_repository::GroupRepository;
pub use membership_repository::MembershipRepository;
pub use store_bootstrap::StoreBootstrap;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
