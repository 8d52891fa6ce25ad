// ── Catalog facade ──
//
// Composes repository, favorites tracker and admin service over one
// backend, tracks the signed-in identity, and owns the optional
// background refresh task.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{CatalogBackend, RestBackend};
use crate::command::{AdminService, Command, CommandResult};
use crate::config::CatalogConfig;
use crate::error::CoreError;
use crate::favorites::FavoritesTracker;
use crate::filter::{self, ProgramQuery};
use crate::model::{Category, EntityId, Identity, ProgramEntry, Shortcut};
use crate::repository::CatalogRepository;
use crate::store::LoadState;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<CatalogInner>`.
pub struct Catalog<B: CatalogBackend> {
    inner: Arc<CatalogInner<B>>,
}

impl<B: CatalogBackend> Clone for Catalog<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogInner<B: CatalogBackend> {
    backend: Arc<B>,
    repository: Arc<CatalogRepository<B>>,
    favorites: FavoritesTracker<B>,
    admin: AdminService<B>,
    identity: ArcSwapOption<Identity>,
    refresh_interval: Duration,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Catalog<RestBackend> {
    /// Build a REST-backed catalog from `config`. Does not fetch anything;
    /// call [`load()`](Self::load).
    pub fn connect(config: &CatalogConfig) -> Result<Self, CoreError> {
        let backend = RestBackend::from_config(config)?;
        Ok(Self::new(backend)
            .with_refresh_interval(Duration::from_secs(config.refresh_interval_secs)))
    }
}

impl<B: CatalogBackend> Catalog<B> {
    pub fn new(backend: B) -> Self {
        Self::shared(Arc::new(backend))
    }

    /// Build over a backend that other owners also hold.
    pub fn shared(backend: Arc<B>) -> Self {
        let repository = Arc::new(CatalogRepository::new(Arc::clone(&backend)));
        Self {
            inner: Arc::new(CatalogInner {
                favorites: FavoritesTracker::new(Arc::clone(&backend)),
                admin: AdminService::new(Arc::clone(&backend), Arc::clone(&repository)),
                backend,
                repository,
                identity: ArcSwapOption::empty(),
                refresh_interval: Duration::ZERO,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Set the background refresh period. Zero disables it.
    ///
    /// Must be called before the catalog is cloned.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.refresh_interval = interval;
        }
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.inner.backend
    }

    pub fn repository(&self) -> &CatalogRepository<B> {
        &self.inner.repository
    }

    pub fn favorites(&self) -> &FavoritesTracker<B> {
        &self.inner.favorites
    }

    pub fn load_state(&self) -> LoadState {
        self.inner.repository.load_state()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Load the catalog, and the identity's favorites when signed in.
    pub async fn load(&self, identity: Option<Identity>) -> Result<(), CoreError> {
        self.inner.repository.load().await?;
        match identity {
            Some(identity) => self.sign_in(identity).await,
            None => {
                self.sign_out();
                Ok(())
            }
        }
    }

    pub async fn sign_in(&self, identity: Identity) -> Result<(), CoreError> {
        self.inner.favorites.load(&identity.user_id).await?;
        info!(user = %identity.user_id, admin = identity.is_admin, "signed in");
        self.inner.identity.store(Some(Arc::new(identity)));
        Ok(())
    }

    pub fn sign_out(&self) {
        self.inner.identity.store(None);
        self.inner.favorites.clear();
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.inner.identity.load_full()
    }

    /// Look up a user's profile. Users without one are plain users.
    pub async fn resolve_identity(&self, user_id: &EntityId) -> Result<Identity, CoreError> {
        let profile = self
            .inner
            .backend
            .load_identity(&user_id.to_string())
            .await?;
        Ok(profile.map_or_else(|| Identity::user(user_id.clone()), Identity::from))
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn categories(&self) -> Arc<Vec<Arc<Category>>> {
        self.inner.repository.categories()
    }

    /// Resolve a category by id or slug.
    pub fn find_category(&self, key: &str) -> Option<Arc<Category>> {
        self.inner.repository.find_category(key)
    }

    /// Filtered, joined and favorite-annotated program rows.
    pub fn programs(&self, query: &ProgramQuery) -> Vec<ProgramEntry> {
        let all = self.inner.repository.programs();
        let mut matched =
            filter::filter_programs(&all, &query.search, query.category.as_ref());
        if query.popular_only {
            matched = filter::popular_programs(&matched);
        }

        let entries = self
            .inner
            .favorites
            .annotate(self.inner.repository.entries_for(&matched));
        if query.favorites_only {
            entries.into_iter().filter(|e| e.is_favorite).collect()
        } else {
            entries
        }
    }

    /// One program's entry, if it exists and its category resolves.
    pub fn program(&self, id: &EntityId) -> Option<ProgramEntry> {
        let program = self.inner.repository.get_program(id)?;
        self.inner
            .favorites
            .annotate(self.inner.repository.entries_for(&[program]))
            .into_iter()
            .next()
    }

    /// A program's shortcuts, narrowed by `search`.
    pub async fn shortcuts(
        &self,
        program_id: &EntityId,
        search: &str,
    ) -> Result<Vec<Arc<Shortcut>>, CoreError> {
        let all = self.inner.repository.shortcuts_for(program_id).await?;
        Ok(filter::filter_shortcuts(&all, search))
    }

    pub fn favorite_programs(&self) -> Vec<ProgramEntry> {
        self.inner
            .favorites
            .favorite_programs(&self.inner.repository)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Toggle a favorite for the signed-in user. Returns the new state.
    pub async fn toggle_favorite(&self, program_id: &EntityId) -> Result<bool, CoreError> {
        let identity = self.identity().ok_or(CoreError::NotAuthenticated)?;
        if self.inner.repository.get_program(program_id).is_none() {
            return Err(CoreError::not_found("program", program_id));
        }
        self.inner
            .favorites
            .toggle(&identity.user_id, program_id)
            .await
    }

    /// Run an admin command as the signed-in user.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let identity = self.identity().ok_or(CoreError::NotAuthenticated)?;
        let result = self.inner.admin.execute(&identity, command).await?;
        let removed = result.removed_programs();
        if !removed.is_empty() {
            debug!(count = removed.len(), "dropping favorites of deleted programs");
            self.inner.favorites.forget(&removed);
        }
        Ok(result)
    }

    // ── Background refresh ───────────────────────────────────────────

    /// Spawn the periodic reload task if an interval is configured.
    pub async fn start_background_refresh(&self) {
        let period = self.inner.refresh_interval;
        if period.is_zero() {
            return;
        }
        let repository = Arc::clone(&self.inner.repository);
        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(refresh_task(repository, period, cancel));
        self.inner.task_handles.lock().await.push(handle);
    }

    /// Cancel background work and wait for it to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("catalog shut down");
    }
}

async fn refresh_task<B: CatalogBackend>(
    repository: Arc<CatalogRepository<B>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = repository.load().await {
                    warn!(error = %e, "background refresh failed");
                }
            }
        }
    }
}
