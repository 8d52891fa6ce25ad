// ── Refresh application ──
//
// Converts fetched records and swaps them into the store. Each apply
// replaces one collection wholesale; nothing here talks to the backend.

use std::sync::Arc;

use chrono::Utc;
use hotkeys_api::{CategoryRecord, ProgramRecord, ShortcutRecord};
use tracing::debug;

use super::{CatalogStore, LoadState};
use crate::model::{Category, EntityId, Program, Shortcut};

impl CatalogStore {
    pub(crate) fn apply_categories(&self, records: Vec<CategoryRecord>) {
        let items: Vec<Category> = records.into_iter().map(Category::from).collect();
        debug!(count = items.len(), "applying categories");
        self.categories.replace_all(items);
    }

    /// Replacing programs also drops cached shortcut lists, since a
    /// removed program's shortcuts must not outlive it.
    pub(crate) fn apply_programs(&self, records: Vec<ProgramRecord>) {
        let items: Vec<Program> = records.into_iter().map(Program::from).collect();
        debug!(count = items.len(), "applying programs");
        self.programs.replace_all(items);
        self.shortcuts_by_program
            .retain(|program_id, _| self.programs.get(program_id).is_some());
    }

    pub(crate) fn apply_shortcuts(&self, records: Vec<ShortcutRecord>) {
        let items: Vec<Shortcut> = records.into_iter().map(Shortcut::from).collect();
        debug!(count = items.len(), "applying shortcut set");
        self.shortcuts.replace_all(items);
        self.shortcuts_by_program.clear();
    }

    pub(crate) fn cache_program_shortcuts(
        &self,
        program_id: EntityId,
        records: Vec<ShortcutRecord>,
    ) -> Arc<Vec<Arc<Shortcut>>> {
        let items: Arc<Vec<Arc<Shortcut>>> = Arc::new(
            records
                .into_iter()
                .map(|r| Arc::new(Shortcut::from(r)))
                .collect(),
        );
        self.shortcuts_by_program
            .insert(program_id, Arc::clone(&items));
        items
    }

    pub(crate) fn cached_program_shortcuts(
        &self,
        program_id: &EntityId,
    ) -> Option<Arc<Vec<Arc<Shortcut>>>> {
        self.shortcuts_by_program
            .get(program_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    // ── Status transitions ───────────────────────────────────────────

    pub(crate) fn mark_loading(&self) {
        self.load_state.send_replace(LoadState::Loading);
    }

    pub(crate) fn mark_ready(&self) {
        self.load_state.send_replace(LoadState::Ready);
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    /// Record a failed fetch. The snapshot is left untouched.
    pub(crate) fn mark_failed(&self, message: String) {
        let stale = self.last_refresh.borrow().is_some();
        self.load_state
            .send_replace(LoadState::Failed { message, stale });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn program(id: &str) -> ProgramRecord {
        ProgramRecord {
            id: id.into(),
            category_id: "c1".into(),
            name: id.to_uppercase(),
            description: None,
            icon: None,
            is_popular: false,
            category: None,
        }
    }

    fn shortcut(id: &str, program_id: &str) -> ShortcutRecord {
        ShortcutRecord {
            id: id.into(),
            program_id: program_id.into(),
            name: "Save".into(),
            keys: "Ctrl+S".into(),
            description: None,
        }
    }

    #[test]
    fn failure_before_first_load_is_not_stale() {
        let store = CatalogStore::new();
        store.mark_failed("offline".into());
        assert_eq!(
            store.load_state(),
            LoadState::Failed {
                message: "offline".into(),
                stale: false
            }
        );
    }

    #[test]
    fn failure_after_ready_is_stale() {
        let store = CatalogStore::new();
        store.mark_ready();
        store.mark_failed("offline".into());
        assert!(matches!(
            store.load_state(),
            LoadState::Failed { stale: true, .. }
        ));
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn program_refresh_evicts_shortcuts_of_removed_programs() {
        let store = CatalogStore::new();
        store.apply_programs(vec![program("p1"), program("p2")]);
        store.cache_program_shortcuts(EntityId::from("p1"), vec![shortcut("s1", "p1")]);
        store.cache_program_shortcuts(EntityId::from("p2"), vec![shortcut("s2", "p2")]);

        store.apply_programs(vec![program("p2")]);

        assert!(store.cached_program_shortcuts(&EntityId::from("p1")).is_none());
        assert_eq!(
            store
                .cached_program_shortcuts(&EntityId::from("p2"))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn full_shortcut_refresh_clears_cache() {
        let store = CatalogStore::new();
        store.cache_program_shortcuts(EntityId::from("p1"), vec![shortcut("s1", "p1")]);
        store.apply_shortcuts(vec![shortcut("s1", "p1"), shortcut("s2", "p1")]);

        assert!(store.cached_program_shortcuts(&EntityId::from("p1")).is_none());
        assert_eq!(store.shortcuts_snapshot().len(), 2);
    }
}
