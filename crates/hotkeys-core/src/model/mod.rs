// ── Domain model ──
//
// Canonical catalog types. Every entity is keyed by an `EntityId`;
// conversion from wire records lives in `crate::convert`.

pub mod category;
pub mod entity_id;
pub mod identity;
pub mod program;
pub mod shortcut;

use serde::{Deserialize, Serialize};

pub use category::{Category, DEFAULT_CATEGORY_COLOR};
pub use entity_id::{EntityId, Slug};
pub use identity::{Favorite, Identity};
pub use program::{Program, ProgramEntry};
pub use shortcut::Shortcut;

/// Anything stored in an id-indexed collection.
pub trait Entity {
    fn id(&self) -> &EntityId;
}

/// The three admin-managed entity kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityKind {
    Category,
    Program,
    Shortcut,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_parses_case_insensitively() {
        assert_eq!("Program".parse::<EntityKind>().unwrap(), EntityKind::Program);
        assert_eq!(EntityKind::Shortcut.to_string(), "shortcut");
        assert!("favorite".parse::<EntityKind>().is_err());
    }
}
