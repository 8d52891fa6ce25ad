// ── In-process catalog store ──
//
// Tables held in memory and seeded from a JSON document. Enforces the
// same constraints as the remote schema (unique slug, unique favorite,
// restrict-on-delete foreign keys) so offline use and tests observe the
// same failures. Fault injection makes the next N reads or writes fail.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use hotkeys_api::{
    CategoryPayload, CategoryRecord, FavoriteRecord, ProfileRecord, ProgramPayload,
    ProgramRecord, ShortcutPayload, ShortcutRecord,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::CatalogBackend;
use crate::error::{ConflictKind, CoreError};
use crate::model::EntityId;

/// Full contents of an in-memory store, as read from or written to a
/// seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub categories: Vec<CategoryRecord>,
    pub programs: Vec<ProgramRecord>,
    pub shortcuts: Vec<ShortcutRecord>,
    pub favorites: Vec<FavoriteRecord>,
    pub profiles: Vec<ProfileRecord>,
}

/// `CatalogBackend` over in-process tables.
pub struct MemoryBackend {
    tables: Mutex<CatalogSeed>,
    failing_reads: AtomicUsize,
    failing_writes: AtomicUsize,
    latency_ms: AtomicU64,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(seed: CatalogSeed) -> Self {
        let mut tables = seed;
        // Embedded joins are recomputed on read.
        for program in &mut tables.programs {
            program.category = None;
        }
        Self {
            tables: Mutex::new(tables),
            failing_reads: AtomicUsize::new(0),
            failing_writes: AtomicUsize::new(0),
            latency_ms: AtomicU64::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(CatalogSeed::default())
    }

    /// Parse a seed document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let seed: CatalogSeed = serde_json::from_str(json).map_err(|e| CoreError::Config {
            message: format!("invalid catalog seed: {e}"),
        })?;
        Ok(Self::new(seed))
    }

    /// Current table contents.
    pub async fn export(&self) -> CatalogSeed {
        self.tables.lock().await.clone()
    }

    // ── Test hooks ───────────────────────────────────────────────────

    /// Make the next `n` read calls fail with a repository error.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` write calls fail with a repository error.
    pub fn fail_next_writes(&self, n: usize) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Number of write calls that reached the tables (including rejected
    /// ones, excluding injected faults).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn enter_read(&self, op: &str) -> Result<(), CoreError> {
        self.simulate_latency().await;
        take_fault(&self.failing_reads, op)
    }

    async fn enter_write(&self, op: &str) -> Result<(), CoreError> {
        self.simulate_latency().await;
        take_fault(&self.failing_writes, op)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

fn take_fault(counter: &AtomicUsize, op: &str) -> Result<(), CoreError> {
    let injected = counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if injected {
        debug!(op, "injected fault");
        return Err(CoreError::Repository {
            cause: format!("injected failure in {op}"),
            status: Some(503),
            code: None,
        });
    }
    Ok(())
}

fn new_id() -> String {
    EntityId::generate().to_string()
}

fn conflict(
    kind: ConflictKind,
    entity_type: &str,
    identifier: &str,
    message: String,
) -> CoreError {
    CoreError::Conflict {
        kind,
        entity_type: entity_type.into(),
        identifier: identifier.into(),
        message,
    }
}

fn missing_row(entity_type: &str, id: &str) -> CoreError {
    CoreError::not_found(entity_type, id)
}

fn sorted_by_name<T: Clone>(rows: &[T], name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| name(a).cmp(name(b)));
    out
}

impl CatalogSeed {
    fn check_slug_free(&self, slug: &str, except: Option<&str>) -> Result<(), CoreError> {
        if self
            .categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id.as_str()) != except)
        {
            return Err(conflict(
                ConflictKind::Unique,
                "category",
                slug,
                format!("duplicate key value violates unique constraint: slug '{slug}'"),
            ));
        }
        Ok(())
    }

    fn check_category_exists(&self, id: &str) -> Result<(), CoreError> {
        if self.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(conflict(
                ConflictKind::ForeignKey,
                "program",
                id,
                format!("foreign key violation: category '{id}' does not exist"),
            ))
        }
    }

    fn check_program_exists(&self, entity_type: &str, id: &str) -> Result<(), CoreError> {
        if self.programs.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(conflict(
                ConflictKind::ForeignKey,
                entity_type,
                id,
                format!("foreign key violation: program '{id}' does not exist"),
            ))
        }
    }

    fn with_category(&self, program: &ProgramRecord) -> ProgramRecord {
        let mut joined = program.clone();
        joined.category = self
            .categories
            .iter()
            .find(|c| c.id == program.category_id)
            .cloned();
        joined
    }
}

impl CatalogBackend for MemoryBackend {
    // ── Categories ───────────────────────────────────────────────────

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CoreError> {
        self.enter_read("list_categories").await?;
        let tables = self.tables.lock().await;
        Ok(sorted_by_name(&tables.categories, |c| c.name.as_str()))
    }

    async fn insert_category(
        &self,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, CoreError> {
        self.enter_write("insert_category").await?;
        let mut tables = self.tables.lock().await;
        tables.check_slug_free(payload.slug, None)?;
        let record = CategoryRecord {
            id: new_id(),
            name: payload.name.to_owned(),
            slug: payload.slug.to_owned(),
            description: Some(payload.description.to_owned()),
            icon: Some(payload.icon.to_owned()),
            color: Some(payload.color.to_owned()),
        };
        tables.categories.push(record.clone());
        Ok(record)
    }

    async fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, CoreError> {
        self.enter_write("update_category").await?;
        let mut tables = self.tables.lock().await;
        tables.check_slug_free(payload.slug, Some(id))?;
        let row = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing_row("category", id))?;
        row.name = payload.name.to_owned();
        row.slug = payload.slug.to_owned();
        row.description = Some(payload.description.to_owned());
        row.icon = Some(payload.icon.to_owned());
        row.color = Some(payload.color.to_owned());
        Ok(row.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<usize, CoreError> {
        self.enter_write("delete_category").await?;
        let mut tables = self.tables.lock().await;
        if tables.programs.iter().any(|p| p.category_id == id) {
            return Err(conflict(
                ConflictKind::ForeignKey,
                "category",
                id,
                format!("foreign key violation: category '{id}' is still referenced by programs"),
            ));
        }
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(before - tables.categories.len())
    }

    // ── Programs ─────────────────────────────────────────────────────

    async fn list_programs(&self) -> Result<Vec<ProgramRecord>, CoreError> {
        self.enter_read("list_programs").await?;
        let tables = self.tables.lock().await;
        let joined: Vec<ProgramRecord> = tables
            .programs
            .iter()
            .map(|p| tables.with_category(p))
            .collect();
        Ok(sorted_by_name(&joined, |p| p.name.as_str()))
    }

    async fn list_programs_in_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<ProgramRecord>, CoreError> {
        self.enter_read("list_programs_in_category").await?;
        let tables = self.tables.lock().await;
        let matching: Vec<ProgramRecord> = tables
            .programs
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        Ok(sorted_by_name(&matching, |p| p.name.as_str()))
    }

    async fn insert_program(&self, payload: &ProgramPayload<'_>) -> Result<ProgramRecord, CoreError> {
        self.enter_write("insert_program").await?;
        let mut tables = self.tables.lock().await;
        tables.check_category_exists(payload.category_id)?;
        let record = ProgramRecord {
            id: new_id(),
            category_id: payload.category_id.to_owned(),
            name: payload.name.to_owned(),
            description: Some(payload.description.to_owned()),
            icon: Some(payload.icon.to_owned()),
            is_popular: payload.is_popular,
            category: None,
        };
        tables.programs.push(record.clone());
        Ok(record)
    }

    async fn update_program(
        &self,
        id: &str,
        payload: &ProgramPayload<'_>,
    ) -> Result<ProgramRecord, CoreError> {
        self.enter_write("update_program").await?;
        let mut tables = self.tables.lock().await;
        tables.check_category_exists(payload.category_id)?;
        let row = tables
            .programs
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| missing_row("program", id))?;
        row.category_id = payload.category_id.to_owned();
        row.name = payload.name.to_owned();
        row.description = Some(payload.description.to_owned());
        row.icon = Some(payload.icon.to_owned());
        row.is_popular = payload.is_popular;
        Ok(row.clone())
    }

    async fn delete_program(&self, id: &str) -> Result<usize, CoreError> {
        self.enter_write("delete_program").await?;
        let mut tables = self.tables.lock().await;
        let referenced = tables.shortcuts.iter().any(|s| s.program_id == id)
            || tables.favorites.iter().any(|f| f.program_id == id);
        if referenced {
            return Err(conflict(
                ConflictKind::ForeignKey,
                "program",
                id,
                format!("foreign key violation: program '{id}' is still referenced"),
            ));
        }
        let before = tables.programs.len();
        tables.programs.retain(|p| p.id != id);
        Ok(before - tables.programs.len())
    }

    // ── Shortcuts ────────────────────────────────────────────────────

    async fn list_shortcuts(&self, program_id: Option<&str>) -> Result<Vec<ShortcutRecord>, CoreError> {
        self.enter_read("list_shortcuts").await?;
        let tables = self.tables.lock().await;
        let matching: Vec<ShortcutRecord> = tables
            .shortcuts
            .iter()
            .filter(|s| program_id.is_none_or(|pid| s.program_id == pid))
            .cloned()
            .collect();
        Ok(sorted_by_name(&matching, |s| s.name.as_str()))
    }

    async fn insert_shortcut(
        &self,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, CoreError> {
        self.enter_write("insert_shortcut").await?;
        let mut tables = self.tables.lock().await;
        tables.check_program_exists("shortcut", payload.program_id)?;
        let record = ShortcutRecord {
            id: new_id(),
            program_id: payload.program_id.to_owned(),
            name: payload.name.to_owned(),
            keys: payload.keys.to_owned(),
            description: Some(payload.description.to_owned()),
        };
        tables.shortcuts.push(record.clone());
        Ok(record)
    }

    async fn update_shortcut(
        &self,
        id: &str,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, CoreError> {
        self.enter_write("update_shortcut").await?;
        let mut tables = self.tables.lock().await;
        tables.check_program_exists("shortcut", payload.program_id)?;
        let row = tables
            .shortcuts
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| missing_row("shortcut", id))?;
        row.program_id = payload.program_id.to_owned();
        row.name = payload.name.to_owned();
        row.keys = payload.keys.to_owned();
        row.description = Some(payload.description.to_owned());
        Ok(row.clone())
    }

    async fn delete_shortcut(&self, id: &str) -> Result<usize, CoreError> {
        self.enter_write("delete_shortcut").await?;
        let mut tables = self.tables.lock().await;
        let before = tables.shortcuts.len();
        tables.shortcuts.retain(|s| s.id != id);
        Ok(before - tables.shortcuts.len())
    }

    async fn delete_shortcuts_of_program(&self, program_id: &str) -> Result<usize, CoreError> {
        self.enter_write("delete_shortcuts_of_program").await?;
        let mut tables = self.tables.lock().await;
        let before = tables.shortcuts.len();
        tables.shortcuts.retain(|s| s.program_id != program_id);
        Ok(before - tables.shortcuts.len())
    }

    // ── Favorites ────────────────────────────────────────────────────

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<FavoriteRecord>, CoreError> {
        self.enter_read("list_favorites").await?;
        let tables = self.tables.lock().await;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_favorite(&self, user_id: &str, program_id: &str) -> Result<(), CoreError> {
        self.enter_write("insert_favorite").await?;
        let mut tables = self.tables.lock().await;
        tables.check_program_exists("favorite", program_id)?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.program_id == program_id)
        {
            return Err(conflict(
                ConflictKind::Unique,
                "favorite",
                program_id,
                format!("duplicate key value violates unique constraint: ({user_id}, {program_id})"),
            ));
        }
        tables.favorites.push(FavoriteRecord {
            id: Some(new_id()),
            user_id: user_id.to_owned(),
            program_id: program_id.to_owned(),
        });
        Ok(())
    }

    async fn delete_favorite(&self, user_id: &str, program_id: &str) -> Result<(), CoreError> {
        self.enter_write("delete_favorite").await?;
        let mut tables = self.tables.lock().await;
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.program_id == program_id));
        Ok(())
    }

    async fn delete_favorites_of_program(&self, program_id: &str) -> Result<usize, CoreError> {
        self.enter_write("delete_favorites_of_program").await?;
        let mut tables = self.tables.lock().await;
        let before = tables.favorites.len();
        tables.favorites.retain(|f| f.program_id != program_id);
        Ok(before - tables.favorites.len())
    }

    // ── Identity ─────────────────────────────────────────────────────

    async fn load_identity(&self, user_id: &str) -> Result<Option<ProfileRecord>, CoreError> {
        self.enter_read("load_identity").await?;
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().find(|p| p.id == user_id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryBackend {
        let seed = json!({
            "categories": [
                { "id": "c1", "name": "Editors", "slug": "editors" },
                { "id": "c2", "name": "Browsers", "slug": "browsers" }
            ],
            "programs": [
                { "id": "p2", "category_id": "c1", "name": "Vim" },
                { "id": "p1", "category_id": "c1", "name": "Code", "is_popular": true }
            ],
            "shortcuts": [
                { "id": "s1", "program_id": "p1", "name": "Save", "keys": "Ctrl+S" }
            ],
            "favorites": [
                { "user_id": "u1", "program_id": "p1" }
            ]
        });
        MemoryBackend::from_json(&seed.to_string()).unwrap()
    }

    fn category<'a>(slug: &'a str) -> CategoryPayload<'a> {
        CategoryPayload {
            name: "New",
            slug,
            description: "",
            icon: "",
            color: "#3b82f6",
        }
    }

    #[tokio::test]
    async fn lists_are_name_ordered_and_joined() {
        let backend = seeded();
        let programs = backend.list_programs().await.unwrap();

        assert_eq!(programs[0].name, "Code");
        assert_eq!(programs[0].category.as_ref().unwrap().slug, "editors");
        assert_eq!(backend.list_categories().await.unwrap()[0].name, "Browsers");
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let backend = seeded();
        let err = backend.insert_category(&category("editors")).await.unwrap_err();
        assert!(err.is_conflict());

        // Updating a category to its own slug is fine.
        backend.update_category("c1", &category("editors")).await.unwrap();
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() {
        let backend = seeded();
        assert!(backend.delete_category("c1").await.unwrap_err().is_conflict());
        assert!(backend.delete_program("p1").await.unwrap_err().is_conflict());
        assert_eq!(backend.delete_category("c2").await.unwrap(), 1);
        assert_eq!(backend.delete_category("c2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn favorites_are_unique_per_user_and_program() {
        let backend = seeded();
        assert!(
            backend
                .insert_favorite("u1", "p1")
                .await
                .unwrap_err()
                .is_unique_violation()
        );
        let dangling = backend.insert_favorite("u1", "p9").await.unwrap_err();
        assert!(dangling.is_conflict() && !dangling.is_unique_violation());
        backend.insert_favorite("u2", "p1").await.unwrap();
        assert_eq!(backend.delete_favorites_of_program("p1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn injected_faults_are_consumed() {
        let backend = seeded();
        backend.fail_next_reads(1);
        assert!(matches!(
            backend.list_categories().await,
            Err(CoreError::Repository { .. })
        ));
        backend.list_categories().await.unwrap();

        backend.fail_next_writes(1);
        assert!(backend.delete_shortcut("s1").await.is_err());
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.delete_shortcut("s1").await.unwrap(), 1);
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn export_reflects_writes() {
        let backend = seeded();
        backend.insert_category(&category("tools")).await.unwrap();
        let seed = backend.export().await;
        assert!(seed.categories.iter().any(|c| c.slug == "tools"));
    }
}
