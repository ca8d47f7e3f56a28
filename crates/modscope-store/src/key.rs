use std::fmt;

use modscope_types::{ModId, OwnerId};
use serde::{Deserialize, Serialize};

/// Composite key of one scoped data entry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataKey {
    pub owner: OwnerId,
    pub mod_id: ModId,
}

impl DataKey {
    pub fn new(owner: OwnerId, mod_id: ModId) -> Self {
        Self { owner, mod_id }
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey({}, {})", self.owner.get(), self.mod_id)
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.mod_id)
    }
}
