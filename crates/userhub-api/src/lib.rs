//! # UserHub API
//!
//! HTTP handlers, DTOs, error mapping, and the router.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
