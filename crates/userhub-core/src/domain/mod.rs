//! # UserHub Core - Domain Module
//! 
//! Domain entities for the UserHub service.

pub mod user;
pub mod group;
pub mod membership;

pub use user::{NewUser, User};
pub use group::{Group, NewGroup};
pub use membership::Membership;
