// ── Partial drafts for admin saves ──
//
// A draft with `id` updates that row, keeping stored values for absent
// fields; a draft without `id` inserts, filling defaults. Resolution
// yields fully-populated, trimmed, validated field sets.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Category, DEFAULT_CATEGORY_COLOR, EntityId, Program, Shortcut, Slug};

/// Trimmed and non-empty, or a validation error naming `field`.
fn required(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(CoreError::validation(field, format!("{field} is required"))),
    }
}

fn optional(value: Option<String>, stored: Option<&str>) -> String {
    value
        .or_else(|| stored.map(str::to_owned))
        .unwrap_or_default()
}

// ── Category ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Validated category columns ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl CategoryDraft {
    /// Merge with `stored` (the row being updated, if any) and validate.
    pub fn resolve(self, stored: Option<&Category>) -> Result<CategoryFields, CoreError> {
        let name = required("name", self.name.as_deref().or(stored.map(|c| c.name.as_str())))?;
        let slug = required("slug", self.slug.as_deref().or(stored.map(|c| c.slug.as_str())))?;
        let color = optional(self.color, stored.map(|c| c.color.as_str()));
        Ok(CategoryFields {
            name,
            slug: Slug::parse(&slug)?,
            description: optional(self.description, stored.map(|c| c.description.as_str())),
            icon: optional(self.icon, stored.map(|c| c.icon.as_str())),
            color: if color.trim().is_empty() {
                DEFAULT_CATEGORY_COLOR.to_owned()
            } else {
                color
            },
        })
    }
}

// ── Program ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFields {
    pub category_id: EntityId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub is_popular: bool,
}

impl ProgramDraft {
    /// Merge and validate. Does not check that the category exists.
    pub fn resolve(self, stored: Option<&Program>) -> Result<ProgramFields, CoreError> {
        let category_id = self
            .category_id
            .or_else(|| stored.map(|p| p.category_id.clone()))
            .ok_or_else(|| CoreError::validation("category_id", "category_id is required"))?;
        Ok(ProgramFields {
            category_id,
            name: required("name", self.name.as_deref().or(stored.map(|p| p.name.as_str())))?,
            description: optional(self.description, stored.map(|p| p.description.as_str())),
            icon: optional(self.icon, stored.map(|p| p.icon.as_str())),
            is_popular: self
                .is_popular
                .or(stored.map(|p| p.is_popular))
                .unwrap_or(false),
        })
    }
}

// ── Shortcut ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutFields {
    pub program_id: EntityId,
    pub name: String,
    pub keys: String,
    pub description: String,
}

impl ShortcutDraft {
    /// Checks that need no stored row: supplied text must be non-blank,
    /// and an insert must carry every required field.
    pub fn check_supplied(&self) -> Result<(), CoreError> {
        for (field, value) in [("name", &self.name), ("keys", &self.keys)] {
            if value.is_some() || self.id.is_none() {
                required(field, value.as_deref())?;
            }
        }
        if self.id.is_none() && self.program_id.is_none() {
            return Err(CoreError::validation("program_id", "program_id is required"));
        }
        Ok(())
    }

    /// Merge and validate. Does not check that the program exists.
    pub fn resolve(self, stored: Option<&Shortcut>) -> Result<ShortcutFields, CoreError> {
        let program_id = self
            .program_id
            .or_else(|| stored.map(|s| s.program_id.clone()))
            .ok_or_else(|| CoreError::validation("program_id", "program_id is required"))?;
        Ok(ShortcutFields {
            program_id,
            name: required("name", self.name.as_deref().or(stored.map(|s| s.name.as_str())))?,
            keys: required("keys", self.keys.as_deref().or(stored.map(|s| s.keys.as_str())))?,
            description: optional(self.description, stored.map(|s| s.description.as_str())),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored_category() -> Category {
        Category {
            id: "c1".into(),
            name: "Editors".into(),
            slug: Slug::parse("editors").unwrap(),
            description: "Text editors".into(),
            icon: "E".into(),
            color: "#ff0000".into(),
        }
    }

    #[test]
    fn insert_fills_defaults() {
        let fields = CategoryDraft {
            name: Some(" Browsers ".into()),
            slug: Some("browsers".into()),
            ..CategoryDraft::default()
        }
        .resolve(None)
        .unwrap();

        assert_eq!(fields.name, "Browsers");
        assert_eq!(fields.description, "");
        assert_eq!(fields.color, DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn update_keeps_absent_fields() {
        let stored = stored_category();
        let fields = CategoryDraft {
            id: Some(stored.id.clone()),
            name: Some("Code editors".into()),
            ..CategoryDraft::default()
        }
        .resolve(Some(&stored))
        .unwrap();

        assert_eq!(fields.name, "Code editors");
        assert_eq!(fields.slug.as_str(), "editors");
        assert_eq!(fields.color, "#ff0000");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = CategoryDraft {
            name: Some("   ".into()),
            slug: Some("x".into()),
            ..CategoryDraft::default()
        }
        .resolve(None)
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn program_requires_category_on_insert() {
        let err = ProgramDraft {
            name: Some("Code".into()),
            ..ProgramDraft::default()
        }
        .resolve(None)
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "category_id"));
    }

    #[test]
    fn shortcut_requires_keys() {
        let err = ShortcutDraft {
            program_id: Some("p1".into()),
            name: Some("Save".into()),
            ..ShortcutDraft::default()
        }
        .resolve(None)
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "keys"));
    }

    #[test]
    fn supplied_shortcut_fields_are_checked_without_stored_row() {
        let blank_update = ShortcutDraft {
            id: Some("s1".into()),
            name: Some(" ".into()),
            ..ShortcutDraft::default()
        };
        assert!(blank_update.check_supplied().is_err());

        let partial_update = ShortcutDraft {
            id: Some("s1".into()),
            keys: Some("Cmd+S".into()),
            ..ShortcutDraft::default()
        };
        assert!(partial_update.check_supplied().is_ok());

        let orphan_insert = ShortcutDraft {
            name: Some("Save".into()),
            keys: Some("Ctrl+S".into()),
            ..ShortcutDraft::default()
        };
        assert!(matches!(
            orphan_insert.check_supplied(),
            Err(CoreError::Validation { ref field, .. }) if field == "program_id"
        ));
    }
}
