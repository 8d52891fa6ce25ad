// ── Catalog snapshot store ──
//
// Passive storage for the three catalog collections plus load status.
// Only `CatalogRepository` writes here; everything else reads snapshots.

mod collection;
mod refresh;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

pub use collection::Snapshot;
pub(crate) use collection::EntityCollection;

use crate::model::{Category, EntityId, Program, Shortcut};
use crate::stream::EntityStream;

/// Status of the most recent load or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// The last fetch failed. `stale` is `true` when an earlier snapshot is
    /// still being served.
    Failed { message: String, stale: bool },
}

/// In-memory snapshot of the catalog.
pub struct CatalogStore {
    pub(crate) categories: EntityCollection<Category>,
    pub(crate) programs: EntityCollection<Program>,
    /// Full shortcut set, populated by an explicit shortcut refresh.
    pub(crate) shortcuts: EntityCollection<Shortcut>,
    /// Per-program shortcut lists fetched on demand.
    pub(crate) shortcuts_by_program: DashMap<EntityId, Arc<Vec<Arc<Shortcut>>>>,
    pub(crate) load_state: watch::Sender<LoadState>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        let (load_state, _) = watch::channel(LoadState::Idle);
        let (last_refresh, _) = watch::channel(None);
        Self {
            categories: EntityCollection::new(),
            programs: EntityCollection::new(),
            shortcuts: EntityCollection::new(),
            shortcuts_by_program: DashMap::new(),
            load_state,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn categories_snapshot(&self) -> Arc<Vec<Arc<Category>>> {
        self.categories.items()
    }

    pub fn programs_snapshot(&self) -> Arc<Vec<Arc<Program>>> {
        self.programs.items()
    }

    pub fn shortcuts_snapshot(&self) -> Arc<Vec<Arc<Shortcut>>> {
        self.shortcuts.items()
    }

    pub fn category(&self, id: &EntityId) -> Option<Arc<Category>> {
        self.categories.get(id)
    }

    pub fn program(&self, id: &EntityId) -> Option<Arc<Program>> {
        self.programs.get(id)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_categories(&self) -> EntityStream<Category> {
        EntityStream::new(self.categories.subscribe())
    }

    pub fn subscribe_programs(&self) -> EntityStream<Program> {
        EntityStream::new(self.programs.subscribe())
    }

    pub fn subscribe_shortcuts(&self) -> EntityStream<Shortcut> {
        EntityStream::new(self.shortcuts.subscribe())
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn load_state(&self) -> LoadState {
        self.load_state.borrow().clone()
    }

    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// Times each collection has been replaced, for change detection.
    pub fn versions(&self) -> (u64, u64, u64) {
        (
            self.categories.version(),
            self.programs.version(),
            self.shortcuts.version(),
        )
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
