//! # UserHub Infrastructure
//! 
//! SQLite store and repository implementations (adapters).

pub mod database;

pub use database::{
    create_pool, SqliteGroupRepository, SqliteMembershipRepository, SqliteStore,
    SqliteUserRepository,
};
