use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// One keyboard shortcut of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: EntityId,
    pub program_id: EntityId,
    pub name: String,
    /// Display string such as `Ctrl+Shift+P`. Never parsed.
    pub keys: String,
    pub description: String,
}

impl Entity for Shortcut {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
