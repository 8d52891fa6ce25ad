// ── Command API ──
//
// Every admin write flows through the `Command` enum and is executed by
// `AdminService`, which validates, writes, and refreshes the affected
// collections.

pub mod admin;
pub mod requests;

use serde::Serialize;

use crate::model::{EntityId, EntityKind};

pub use admin::AdminService;
pub use requests::{
    CategoryDraft, CategoryFields, ProgramDraft, ProgramFields, ShortcutDraft, ShortcutFields,
};

/// All write operations an administrator can perform.
#[derive(Debug, Clone)]
pub enum Command {
    SaveCategory(CategoryDraft),
    SaveProgram(ProgramDraft),
    SaveShortcut(ShortcutDraft),
    /// Delete an entity and, leaf-first, everything that depends on it.
    Delete { kind: EntityKind, id: EntityId },
}

/// Dependents removed alongside a deleted entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    /// Programs removed because their category was deleted.
    pub programs: Vec<EntityId>,
    pub shortcuts: usize,
    pub favorites: usize,
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    Saved {
        kind: EntityKind,
        id: EntityId,
    },
    Deleted {
        kind: EntityKind,
        id: EntityId,
        cascade: CascadeSummary,
    },
}

impl CommandResult {
    /// Every program id this result removed, including the target itself.
    pub fn removed_programs(&self) -> Vec<EntityId> {
        match self {
            Self::Deleted {
                kind: EntityKind::Program,
                id,
                ..
            } => vec![id.clone()],
            Self::Deleted { cascade, .. } => cascade.programs.clone(),
            Self::Saved { .. } => Vec::new(),
        }
    }
}
