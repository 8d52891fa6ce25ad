// ── Identity types ──
//
// EntityId and Slug are shared by every catalog entity. EntityId hides
// whether the store hands out UUIDs or opaque string keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

// ── EntityId ────────────────────────────────────────────────────────

/// Identifier of a category, program, shortcut or user.
///
/// Parsing a string yields the `Uuid` form whenever the text is a valid
/// UUID, so the same id read from two sources always compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Key(String),
}

impl EntityId {
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Key(_) => None,
        }
    }

    /// Fresh random id, used by the in-memory store.
    pub fn generate() -> Self {
        Self::Uuid(Uuid::new_v4())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Key(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Key(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

// ── Slug ────────────────────────────────────────────────────────────

/// URL-safe category key: non-empty ASCII alphanumerics, `-` and `_`.
///
/// Comparison is case-sensitive; `Office` and `office` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate user input.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation {
                field: "slug".into(),
                message: "slug must not be empty".into(),
            });
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CoreError::Validation {
                field: "slug".into(),
                message: format!("slug '{trimmed}' contains invalid character '{bad}'"),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a slug read back from the store. Stored rows are taken as-is.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_uuid_string() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert!(id.as_uuid().is_some());
    }

    #[test]
    fn entity_id_from_key_string() {
        let id = EntityId::from("c1");
        assert_eq!(id, EntityId::Key("c1".into()));
        assert_eq!(id.to_string(), "c1");
    }

    #[test]
    fn entity_id_deserializes_untagged() {
        let id: EntityId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(id, EntityId::from("p1"));
    }

    #[test]
    fn slug_accepts_url_safe_text() {
        assert_eq!(Slug::parse(" dev-tools_2 ").unwrap().as_str(), "dev-tools_2");
    }

    #[test]
    fn slug_rejects_spaces_and_empty() {
        assert!(matches!(
            Slug::parse("dev tools"),
            Err(CoreError::Validation { ref field, .. }) if field == "slug"
        ));
        assert!(Slug::parse("   ").is_err());
    }

    #[test]
    fn slug_comparison_is_case_sensitive() {
        assert_ne!(Slug::parse("Office").unwrap(), Slug::parse("office").unwrap());
    }
}
