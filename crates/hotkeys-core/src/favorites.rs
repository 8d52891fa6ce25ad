// ── Favorites tracker ──
//
// Per-user set of favorited program ids with optimistic toggles.
//
// Each toggle flips local membership immediately, then queues exactly one
// remote write on a FIFO lane. That write carries the newest intent for the
// program. A per-program ledger records the newest ticket and the last
// membership the store confirmed; a failed write rolls back to the
// confirmed state only when no newer toggle has superseded it.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::CatalogBackend;
use crate::error::CoreError;
use crate::model::{EntityId, ProgramEntry};
use crate::repository::CatalogRepository;

#[derive(Debug, Clone, Copy)]
struct Ledger {
    /// Ticket of the newest toggle issued for this program.
    latest: u64,
    /// Membership last acknowledged by the store.
    confirmed: bool,
}

/// Favorite membership for the signed-in user.
pub struct FavoritesTracker<B> {
    backend: Arc<B>,
    owner: ArcSwapOption<EntityId>,
    members: ArcSwap<HashSet<EntityId>>,
    ledger: DashMap<EntityId, Ledger>,
    next_ticket: AtomicU64,
    write_lane: Mutex<()>,
}

impl<B: CatalogBackend> FavoritesTracker<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            owner: ArcSwapOption::empty(),
            members: ArcSwap::from_pointee(HashSet::new()),
            ledger: DashMap::new(),
            next_ticket: AtomicU64::new(0),
            write_lane: Mutex::new(()),
        }
    }

    /// Fetch `user_id`'s favorites and make them the local set.
    pub async fn load(&self, user_id: &EntityId) -> Result<(), CoreError> {
        let rows = self.backend.list_favorites(&user_id.to_string()).await?;
        let set: HashSet<EntityId> = rows
            .into_iter()
            .map(|r| EntityId::from(r.program_id))
            .collect();
        debug!(user = %user_id, count = set.len(), "favorites loaded");

        self.ledger.clear();
        self.members.store(Arc::new(set));
        self.owner.store(Some(Arc::new(user_id.clone())));
        Ok(())
    }

    /// Drop all state (sign-out).
    pub fn clear(&self) {
        self.owner.store(None);
        self.members.store(Arc::new(HashSet::new()));
        self.ledger.clear();
    }

    /// Remove ids whose programs were deleted. No remote write; the
    /// favorite rows are gone with the program.
    pub fn forget(&self, program_ids: &[EntityId]) {
        if program_ids.is_empty() {
            return;
        }
        self.members.rcu(|current| {
            let mut next = HashSet::clone(current);
            for id in program_ids {
                next.remove(id);
            }
            next
        });
        for id in program_ids {
            self.ledger.remove(id);
        }
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner.load_full().map(|o| EntityId::clone(&o))
    }

    pub fn is_favorite(&self, program_id: &EntityId) -> bool {
        self.members.load().contains(program_id)
    }

    /// Snapshot of the current membership set.
    pub fn members(&self) -> Arc<HashSet<EntityId>> {
        self.members.load_full()
    }

    /// Flip `program_id` for `user_id`. Returns the membership now held.
    ///
    /// Local state changes before the remote write starts. If the write
    /// fails and this is still the newest toggle for the program, local
    /// state reverts to what the store last confirmed.
    pub async fn toggle(&self, user_id: &EntityId, program_id: &EntityId) -> Result<bool, CoreError> {
        self.check_owner(user_id)?;

        // Ticket, flip and ledger update happen under the program's ledger
        // entry, so ticket order matches the order of local flips.
        let (ticket, now_member) = {
            let mut entry = self
                .ledger
                .entry(program_id.clone())
                .or_insert_with(|| Ledger {
                    latest: 0,
                    confirmed: self.members.load().contains(program_id),
                });
            let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
            let mut now_member = false;
            self.members.rcu(|current| {
                let mut next = HashSet::clone(current);
                now_member = !next.remove(program_id);
                if now_member {
                    next.insert(program_id.clone());
                }
                next
            });
            entry.latest = ticket;
            (ticket, now_member)
        };

        let _lane = self.write_lane.lock().await;
        // Lane order can differ from flip order; write the newest intent.
        let desired = self.is_favorite(program_id);
        let user = user_id.to_string();
        let program = program_id.to_string();
        let outcome = if desired {
            match self.backend.insert_favorite(&user, &program).await {
                // Already present remotely: the intent holds.
                Err(e) if e.is_unique_violation() => {
                    debug!(program = %program_id, "favorite already present");
                    Ok(())
                }
                other => other,
            }
        } else {
            self.backend.delete_favorite(&user, &program).await
        };

        match outcome {
            Ok(()) => {
                if let Some(mut entry) = self.ledger.get_mut(program_id) {
                    entry.confirmed = desired;
                }
                Ok(now_member)
            }
            Err(e) => {
                self.roll_back(program_id, ticket);
                Err(e)
            }
        }
    }

    /// Programs the user has favorited, joined and in catalog order.
    /// Ids whose program no longer exists are skipped.
    pub fn favorite_programs(&self, repository: &CatalogRepository<B>) -> Vec<ProgramEntry> {
        let members = self.members.load();
        let favorites: Vec<_> = repository
            .programs()
            .iter()
            .filter(|p| members.contains(&p.id))
            .cloned()
            .collect();
        self.annotate(repository.entries_for(&favorites))
    }

    /// Set `is_favorite` on each entry from the current membership.
    pub fn annotate(&self, entries: Vec<ProgramEntry>) -> Vec<ProgramEntry> {
        let members = self.members.load();
        entries
            .into_iter()
            .map(|mut entry| {
                entry.is_favorite = members.contains(&entry.program.id);
                entry
            })
            .collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn check_owner(&self, user_id: &EntityId) -> Result<(), CoreError> {
        match self.owner.load().as_deref() {
            None => Err(CoreError::NotAuthenticated),
            Some(owner) if owner != user_id => Err(CoreError::Forbidden {
                operation: format!("toggle favorites of user {user_id}"),
            }),
            Some(_) => Ok(()),
        }
    }

    fn roll_back(&self, program_id: &EntityId, ticket: u64) {
        // Holding the entry keeps newer toggles from flipping mid-rollback.
        let Some(entry) = self.ledger.get(program_id) else {
            return;
        };
        if entry.latest != ticket {
            debug!(program = %program_id, ticket, "superseded toggle failed, keeping newer intent");
            return;
        }
        let confirmed = entry.confirmed;

        warn!(program = %program_id, restored = confirmed, "favorite write failed, rolling back");
        self.members.rcu(|current| {
            let mut next = HashSet::clone(current);
            if confirmed {
                next.insert(program_id.clone());
            } else {
                next.remove(program_id);
            }
            next
        });
        drop(entry);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    async fn tracker() -> (Arc<MemoryBackend>, FavoritesTracker<MemoryBackend>) {
        let seed = json!({
            "categories": [{ "id": "c1", "name": "Editors", "slug": "editors" }],
            "programs": [
                { "id": "p1", "category_id": "c1", "name": "Code" },
                { "id": "p2", "category_id": "c1", "name": "Vim" }
            ],
            "favorites": [{ "user_id": "u1", "program_id": "p1" }]
        });
        let backend = Arc::new(MemoryBackend::from_json(&seed.to_string()).unwrap());
        let tracker = FavoritesTracker::new(Arc::clone(&backend));
        tracker.load(&"u1".into()).await.unwrap();
        (backend, tracker)
    }

    #[tokio::test]
    async fn load_replaces_membership() {
        let (_, tracker) = tracker().await;
        assert!(tracker.is_favorite(&"p1".into()));
        assert!(!tracker.is_favorite(&"p2".into()));
        assert_eq!(tracker.owner(), Some("u1".into()));
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_set() {
        let (backend, tracker) = tracker().await;
        let before = tracker.members();

        assert!(tracker.toggle(&"u1".into(), &"p2".into()).await.unwrap());
        assert!(!tracker.toggle(&"u1".into(), &"p2".into()).await.unwrap());

        assert_eq!(*tracker.members(), *before);
        assert_eq!(backend.write_count(), 2);
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let (backend, tracker) = tracker().await;
        backend.fail_next_writes(1);

        let result = tracker.toggle(&"u1".into(), &"p1".into()).await;

        assert!(result.is_err());
        assert!(tracker.is_favorite(&"p1".into()));
    }

    #[tokio::test]
    async fn existing_remote_favorite_counts_as_success() {
        let (backend, tracker) = tracker().await;
        // Local set loses p1 without telling the store.
        tracker.forget(&["p1".into()]);

        assert!(tracker.toggle(&"u1".into(), &"p1".into()).await.unwrap());
        assert!(tracker.is_favorite(&"p1".into()));
        assert_eq!(backend.export().await.favorites.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_leave_store_matching_local_set() {
        let (backend, tracker) = tracker().await;
        backend.set_latency(std::time::Duration::from_millis(2));
        let tracker = Arc::new(tracker);

        let handles: Vec<_> = (0..9)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move { tracker.toggle(&"u1".into(), &"p2".into()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Nine flips from absent end at present.
        assert!(tracker.is_favorite(&"p2".into()));
        let stored = backend.export().await.favorites;
        assert!(stored.iter().any(|f| f.user_id == "u1" && f.program_id == "p2"));
        assert_eq!(backend.write_count(), 9);
    }

    #[tokio::test]
    async fn dangling_program_insert_rolls_back() {
        let (backend, tracker) = tracker().await;
        backend.delete_program("p2").await.unwrap();

        let err = tracker.toggle(&"u1".into(), &"p2".into()).await.unwrap_err();

        assert!(err.is_conflict() && !err.is_unique_violation());
        assert!(!tracker.is_favorite(&"p2".into()));
    }

    #[tokio::test]
    async fn anonymous_and_foreign_toggles_are_rejected() {
        let (backend, tracker) = tracker().await;
        assert!(matches!(
            tracker.toggle(&"u2".into(), &"p1".into()).await,
            Err(CoreError::Forbidden { .. })
        ));

        tracker.clear();
        assert!(matches!(
            tracker.toggle(&"u1".into(), &"p1".into()).await,
            Err(CoreError::NotAuthenticated)
        ));
        assert_eq!(backend.write_count(), 0);
    }
}
