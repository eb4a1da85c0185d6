//! Group participants.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant in a group. The id is stable for the member's lifetime;
/// the name is display-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
}

impl Member {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}
