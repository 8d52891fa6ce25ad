// ── Search / filter engine ──
//
// Pure functions deriving views from a snapshot. Matching is a
// case-folded substring test; input order is always preserved.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{EntityId, Program, Shortcut};

/// Everything a program listing can be narrowed by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramQuery {
    /// Free text matched against name and description.
    pub search: String,
    pub category: Option<EntityId>,
    pub popular_only: bool,
    pub favorites_only: bool,
}

impl ProgramQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<EntityId>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Case-folded needle, or `None` when the query matches everything.
fn needle(query: &str) -> Option<String> {
    (!query.is_empty()).then(|| query.to_lowercase())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Programs in `category_id` (when given) whose name or description
/// contains `query` case-insensitively.
pub fn filter_programs(
    programs: &[Arc<Program>],
    query: &str,
    category_id: Option<&EntityId>,
) -> Vec<Arc<Program>> {
    let needle = needle(query);
    if needle.is_none() && category_id.is_none() {
        return programs.to_vec();
    }

    programs
        .iter()
        .filter(|p| category_id.is_none_or(|c| &p.category_id == c))
        .filter(|p| {
            needle.as_deref().is_none_or(|n| {
                contains_folded(&p.name, n) || contains_folded(&p.description, n)
            })
        })
        .cloned()
        .collect()
}

/// Shortcuts whose name, keys or description contains `query`
/// case-insensitively.
pub fn filter_shortcuts(shortcuts: &[Arc<Shortcut>], query: &str) -> Vec<Arc<Shortcut>> {
    let Some(needle) = needle(query) else {
        return shortcuts.to_vec();
    };

    shortcuts
        .iter()
        .filter(|s| {
            contains_folded(&s.name, &needle)
                || contains_folded(&s.keys, &needle)
                || contains_folded(&s.description, &needle)
        })
        .cloned()
        .collect()
}

/// The programs flagged `is_popular`, in input order.
pub fn popular_programs(programs: &[Arc<Program>]) -> Vec<Arc<Program>> {
    programs.iter().filter(|p| p.is_popular).cloned().collect()
}
