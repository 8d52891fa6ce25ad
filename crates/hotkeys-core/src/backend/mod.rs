// ── Catalog backend seam ──
//
// The repository, favorites tracker and admin service talk to the store
// only through `CatalogBackend`. Methods exchange wire records so both
// implementations share one conversion path (`crate::convert`).

mod memory;
mod rest;

use std::future::Future;

use hotkeys_api::{
    CategoryPayload, CategoryRecord, FavoriteRecord, ProfileRecord, ProgramPayload,
    ProgramRecord, ShortcutPayload, ShortcutRecord,
};

use crate::error::CoreError;

pub use memory::{CatalogSeed, MemoryBackend};
pub use rest::RestBackend;

/// Record CRUD and relational lookups over the four catalog tables.
///
/// Ids cross this seam in their wire (string) form. Deletes report how
/// many rows they removed so callers can tell a no-op from a hit.
pub trait CatalogBackend: Send + Sync + 'static {
    // ── Categories ───────────────────────────────────────────────────
    fn list_categories(&self)
    -> impl Future<Output = Result<Vec<CategoryRecord>, CoreError>> + Send;

    fn insert_category(
        &self,
        payload: &CategoryPayload<'_>,
    ) -> impl Future<Output = Result<CategoryRecord, CoreError>> + Send;

    fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload<'_>,
    ) -> impl Future<Output = Result<CategoryRecord, CoreError>> + Send;

    fn delete_category(&self, id: &str) -> impl Future<Output = Result<usize, CoreError>> + Send;

    // ── Programs ─────────────────────────────────────────────────────
    /// All programs ordered by name, each joined with its category.
    fn list_programs(&self) -> impl Future<Output = Result<Vec<ProgramRecord>, CoreError>> + Send;

    fn list_programs_in_category(
        &self,
        category_id: &str,
    ) -> impl Future<Output = Result<Vec<ProgramRecord>, CoreError>> + Send;

    fn insert_program(
        &self,
        payload: &ProgramPayload<'_>,
    ) -> impl Future<Output = Result<ProgramRecord, CoreError>> + Send;

    fn update_program(
        &self,
        id: &str,
        payload: &ProgramPayload<'_>,
    ) -> impl Future<Output = Result<ProgramRecord, CoreError>> + Send;

    fn delete_program(&self, id: &str) -> impl Future<Output = Result<usize, CoreError>> + Send;

    // ── Shortcuts ────────────────────────────────────────────────────
    /// All shortcuts, or only those of `program_id`.
    fn list_shortcuts(
        &self,
        program_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ShortcutRecord>, CoreError>> + Send;

    fn insert_shortcut(
        &self,
        payload: &ShortcutPayload<'_>,
    ) -> impl Future<Output = Result<ShortcutRecord, CoreError>> + Send;

    fn update_shortcut(
        &self,
        id: &str,
        payload: &ShortcutPayload<'_>,
    ) -> impl Future<Output = Result<ShortcutRecord, CoreError>> + Send;

    fn delete_shortcut(&self, id: &str) -> impl Future<Output = Result<usize, CoreError>> + Send;

    fn delete_shortcuts_of_program(
        &self,
        program_id: &str,
    ) -> impl Future<Output = Result<usize, CoreError>> + Send;

    // ── Favorites ────────────────────────────────────────────────────
    fn list_favorites(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<FavoriteRecord>, CoreError>> + Send;

    fn insert_favorite(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_favorite(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_favorites_of_program(
        &self,
        program_id: &str,
    ) -> impl Future<Output = Result<usize, CoreError>> + Send;

    // ── Identity ─────────────────────────────────────────────────────
    /// Profile of `user_id`, or `None` when the auth provider has none.
    fn load_identity(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<ProfileRecord>, CoreError>> + Send;
}
