// ── Snapshot-swapped entity collection ──
//
// Each collection is a single immutable snapshot (ordered items plus an
// id index) held in a `watch` channel. Replacing the collection swaps the
// whole snapshot in one step, so readers see either the old set or the
// new one, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Entity, EntityId};

/// One immutable generation of a collection.
#[derive(Debug)]
pub struct Snapshot<T> {
    items: Arc<Vec<Arc<T>>>,
    index: HashMap<EntityId, usize>,
}

impl<T: Entity> Snapshot<T> {
    fn build(items: Vec<T>) -> Self {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id().clone(), pos))
            .collect();
        Self {
            items: Arc::new(items),
            index,
        }
    }
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            index: HashMap::new(),
        }
    }

    /// Items in load order.
    pub fn items(&self) -> &Arc<Vec<Arc<T>>> {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&Arc<T>> {
        self.index.get(id).and_then(|&pos| self.items.get(pos))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A reactive, id-indexed collection for a single entity kind.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    snapshot: watch::Sender<Arc<Snapshot<T>>>,
    /// Bumped on every replacement.
    version: watch::Sender<u64>,
}

impl<T: Entity + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::empty()));
        let (version, _) = watch::channel(0u64);
        Self { snapshot, version }
    }

    /// Replace the whole collection. Order of `items` is preserved.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let next = Arc::new(Snapshot::build(items));
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(next);
        self.version.send_modify(|v| *v += 1);
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.snapshot.borrow().get(id).cloned()
    }

    /// Current snapshot (cheap `Arc` clone).
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Arc<Snapshot<T>> {
        Arc::clone(&*self.snapshot.borrow())
    }

    pub(crate) fn items(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(self.snapshot.borrow().items())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<T>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }
}
