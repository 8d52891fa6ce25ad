// Wire types for the catalog tables.
//
// Records mirror the store's row shape exactly (string ids, nullable text
// columns). Payloads are the borrowed bodies sent on insert/update; they
// never carry `id`, which the store assigns.

use serde::{Deserialize, Serialize};

// ── Records (rows read from the store) ──────────────────────────────

/// Row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Row of the `programs` table, optionally with its category embedded
/// (`select=*,category:categories(*)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
    /// Embedded category. `None` either when not requested or when the
    /// referenced row no longer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRecord>,
}

/// Row of the `shortcuts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub keys: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Row of the `favorites` table. The surrogate `id` column exists in the
/// store but the pair (`user_id`, `program_id`) is the real identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub program_id: String,
}

/// Row of the `profiles` table maintained by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

// ── Payloads (bodies written to the store) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub icon: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramPayload<'a> {
    pub category_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub icon: &'a str,
    pub is_popular: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortcutPayload<'a> {
    pub program_id: &'a str,
    pub name: &'a str,
    pub keys: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoritePayload<'a> {
    pub user_id: &'a str,
    pub program_id: &'a str,
}
