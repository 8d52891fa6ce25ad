// ── Catalog repository ──
//
// Fetches collections from the backend and swaps them into the
// `CatalogStore`. Lookups and joins read the current snapshot; nothing
// here writes to the backend.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::CatalogBackend;
use crate::error::CoreError;
use crate::filter;
use crate::model::{Category, EntityId, EntityKind, Program, ProgramEntry, Shortcut, Slug};
use crate::store::{CatalogStore, LoadState};

/// Authoritative in-memory view of the catalog.
pub struct CatalogRepository<B> {
    backend: Arc<B>,
    store: CatalogStore,
}

impl<B: CatalogBackend> CatalogRepository<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            store: CatalogStore::new(),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn load_state(&self) -> LoadState {
        self.store.load_state()
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Fetch all categories and programs.
    ///
    /// Both fetches must succeed before either collection is replaced. On
    /// failure the previous snapshot stays in place.
    pub async fn load(&self) -> Result<(), CoreError> {
        self.store.mark_loading();
        debug!("loading catalog");

        let fetched = async {
            let categories = self.backend.list_categories().await?;
            let programs = self.backend.list_programs().await?;
            Ok::<_, CoreError>((categories, programs))
        }
        .await;

        match fetched {
            Ok((categories, programs)) => {
                self.store.apply_categories(categories);
                self.store.apply_programs(programs);
                self.store.mark_ready();
                debug!(
                    categories = self.store.category_count(),
                    programs = self.store.program_count(),
                    "catalog loaded"
                );
                Ok(())
            }
            Err(e) => {
                self.store.mark_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetch one entity kind and replace its collection.
    ///
    /// Refreshing shortcuts loads the full shortcut set and drops the
    /// per-program cache.
    pub async fn refresh(&self, kind: EntityKind) -> Result<(), CoreError> {
        debug!(%kind, "refreshing");
        let result = match kind {
            EntityKind::Category => self
                .backend
                .list_categories()
                .await
                .map(|rows| self.store.apply_categories(rows)),
            EntityKind::Program => self
                .backend
                .list_programs()
                .await
                .map(|rows| self.store.apply_programs(rows)),
            EntityKind::Shortcut => self
                .backend
                .list_shortcuts(None)
                .await
                .map(|rows| self.store.apply_shortcuts(rows)),
        };

        match result {
            Ok(()) => {
                self.store.mark_ready();
                Ok(())
            }
            Err(e) => {
                self.store.mark_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Shortcuts of one program, fetched on first use and cached until the
    /// next program or shortcut refresh.
    pub async fn shortcuts_for(
        &self,
        program_id: &EntityId,
    ) -> Result<Arc<Vec<Arc<Shortcut>>>, CoreError> {
        if self.store.program(program_id).is_none() {
            return Err(CoreError::not_found("program", program_id));
        }
        if let Some(cached) = self.store.cached_program_shortcuts(program_id) {
            return Ok(cached);
        }
        let rows = self
            .backend
            .list_shortcuts(Some(&program_id.to_string()))
            .await?;
        Ok(self
            .store
            .cache_program_shortcuts(program_id.clone(), rows))
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn categories(&self) -> Arc<Vec<Arc<Category>>> {
        self.store.categories_snapshot()
    }

    pub fn programs(&self) -> Arc<Vec<Arc<Program>>> {
        self.store.programs_snapshot()
    }

    pub fn get_category(&self, id: &EntityId) -> Option<Arc<Category>> {
        self.store.category(id)
    }

    pub fn get_program(&self, id: &EntityId) -> Option<Arc<Program>> {
        self.store.program(id)
    }

    pub fn category_by_slug(&self, slug: &Slug) -> Option<Arc<Category>> {
        self.categories().iter().find(|c| &c.slug == slug).cloned()
    }

    /// Resolve user input that may be either a slug or an id.
    pub fn find_category(&self, key: &str) -> Option<Arc<Category>> {
        self.get_category(&EntityId::from(key)).or_else(|| {
            Slug::parse(key)
                .ok()
                .and_then(|slug| self.category_by_slug(&slug))
        })
    }

    /// Programs flagged popular, derived from the current snapshot.
    pub fn popular_programs(&self) -> Vec<Arc<Program>> {
        filter::popular_programs(&self.programs())
    }

    // ── Joined views ─────────────────────────────────────────────────

    /// Every program joined with its category, in load order.
    pub fn program_entries(&self) -> Vec<ProgramEntry> {
        self.entries_for(&self.programs())
    }

    /// Join `programs` with their categories. Programs whose category
    /// does not resolve are dropped and logged.
    pub fn entries_for(&self, programs: &[Arc<Program>]) -> Vec<ProgramEntry> {
        programs
            .iter()
            .filter_map(|program| match self.get_category(&program.category_id) {
                Some(category) => Some(ProgramEntry {
                    program: Arc::clone(program),
                    category,
                    is_favorite: false,
                }),
                None => {
                    warn!(
                        program = %program.id,
                        category = %program.category_id,
                        "program references a missing category, hiding it"
                    );
                    None
                }
            })
            .collect()
    }

    /// The loaded shortcut set, minus shortcuts whose program is gone.
    pub fn shortcuts(&self) -> Vec<Arc<Shortcut>> {
        self.store
            .shortcuts_snapshot()
            .iter()
            .filter(|s| {
                let resolved = self.get_program(&s.program_id).is_some();
                if !resolved {
                    warn!(
                        shortcut = %s.id,
                        program = %s.program_id,
                        "shortcut references a missing program, hiding it"
                    );
                }
                resolved
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn repo() -> (Arc<MemoryBackend>, CatalogRepository<MemoryBackend>) {
        let seed = json!({
            "categories": [
                { "id": "c1", "name": "Editors", "slug": "editors" }
            ],
            "programs": [
                { "id": "p1", "category_id": "c1", "name": "Code", "is_popular": true },
                { "id": "p2", "category_id": "ghost", "name": "Orphan" },
                { "id": "p3", "category_id": "c1", "name": "Vim" }
            ],
            "shortcuts": [
                { "id": "s1", "program_id": "p1", "name": "Save", "keys": "Ctrl+S" },
                { "id": "s2", "program_id": "gone", "name": "Lost", "keys": "F1" }
            ]
        });
        let backend = Arc::new(MemoryBackend::from_json(&seed.to_string()).unwrap());
        let repo = CatalogRepository::new(Arc::clone(&backend));
        (backend, repo)
    }

    #[tokio::test]
    async fn load_indexes_by_id() {
        let (_, repo) = repo();
        repo.load().await.unwrap();

        assert_eq!(repo.get_program(&"p3".into()).unwrap().name, "Vim");
        assert_eq!(repo.get_category(&"c1".into()).unwrap().name, "Editors");
        assert_eq!(repo.load_state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn entries_skip_dangling_categories() {
        let (_, repo) = repo();
        repo.load().await.unwrap();

        let names: Vec<_> = repo
            .program_entries()
            .iter()
            .map(|e| e.program.name.clone())
            .collect();
        assert_eq!(names, vec!["Code", "Vim"]);
    }

    #[tokio::test]
    async fn first_load_failure_leaves_collections_empty() {
        let (backend, repo) = repo();
        backend.fail_next_reads(1);

        assert!(repo.load().await.is_err());
        assert!(repo.programs().is_empty());
        assert!(matches!(
            repo.load_state(),
            LoadState::Failed { stale: false, .. }
        ));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let (backend, repo) = repo();
        repo.load().await.unwrap();

        backend.fail_next_reads(1);
        assert!(repo.load().await.is_err());

        assert_eq!(repo.programs().len(), 3);
        assert!(matches!(
            repo.load_state(),
            LoadState::Failed { stale: true, .. }
        ));
    }

    #[tokio::test]
    async fn find_category_accepts_slug_or_id() {
        let (_, repo) = repo();
        repo.load().await.unwrap();

        assert!(repo.find_category("editors").is_some());
        assert!(repo.find_category("c1").is_some());
        assert!(repo.find_category("Editors").is_none());
    }

    #[tokio::test]
    async fn shortcuts_are_fetched_once_per_program() {
        let (backend, repo) = repo();
        repo.load().await.unwrap();

        let first = repo.shortcuts_for(&"p1".into()).await.unwrap();
        backend.fail_next_reads(1);
        let second = repo.shortcuts_for(&"p1".into()).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn shortcuts_of_unknown_program_are_not_found() {
        let (_, repo) = repo();
        repo.load().await.unwrap();
        assert!(matches!(
            repo.shortcuts_for(&"nope".into()).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn shortcut_view_hides_dangling_programs() {
        let (_, repo) = repo();
        repo.load().await.unwrap();
        repo.refresh(EntityKind::Shortcut).await.unwrap();

        let ids: Vec<_> = repo.shortcuts().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["s1"]);
    }
}
