//! User-group membership
//!
//! A membership row has no identity of its own and the store does not
//! constrain pairs to be unique: adding the same user to the same group twice
//! records two rows. Reads through the repositories collapse duplicates.

use serde::{Deserialize, Serialize};
use userhub_shared::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: EntityId,
    pub group_id: EntityId,
}

impl Membership {
    pub fn new(user_id: EntityId, group_id: EntityId) -> Self {
        Self { user_id, group_id }
    }
}
