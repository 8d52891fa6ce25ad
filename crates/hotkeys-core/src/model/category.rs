use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Slug};

/// Accent color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

/// A top-level grouping of programs ("Editors", "Browsers").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    /// Display glyph.
    pub icon: String,
    /// Display accent, usually a hex color.
    pub color: String,
}

impl Entity for Category {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
