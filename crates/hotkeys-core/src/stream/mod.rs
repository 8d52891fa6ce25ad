// ── Reactive entity streams ──
//
// Subscription types for consuming collection replacements from the
// CatalogStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Snapshot;

/// A subscription to one catalog collection.
///
/// Holds the snapshot current at creation time and can wait for the next
/// replacement. Every item yielded is a complete collection.
pub struct EntityStream<T: Send + Sync + 'static> {
    current: Arc<Snapshot<T>>,
    receiver: watch::Receiver<Arc<Snapshot<T>>>,
}

impl<T: Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Snapshot<T>>>) -> Self {
        let current = Arc::clone(&*receiver.borrow());
        Self { current, receiver }
    }

    /// Items captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<Vec<Arc<T>>> {
        self.current.items()
    }

    /// Latest items, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(self.receiver.borrow().items())
    }

    /// Wait for the next replacement. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        self.receiver.changed().await.ok()?;
        let snap = Arc::clone(&*self.receiver.borrow_and_update());
        self.current = snap;
        Some(Arc::clone(self.current.items()))
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> EntityWatchStream<T> {
        EntityWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding the item list of each new snapshot.
pub struct EntityWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Arc<Snapshot<T>>>,
}

impl<T: Send + Sync + 'static> Stream for EntityWatchStream<T> {
    type Item = Arc<Vec<Arc<T>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|snap| snap.map(|s| Arc::clone(s.items())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;
    use hotkeys_api::CategoryRecord;

    use crate::store::CatalogStore;

    fn category(id: &str, name: &str) -> CategoryRecord {
        CategoryRecord {
            id: id.into(),
            name: name.into(),
            slug: name.to_lowercase(),
            description: None,
            icon: None,
            color: None,
        }
    }

    #[tokio::test]
    async fn changed_advances_current() {
        let store = CatalogStore::new();
        let mut stream = store.subscribe_categories();
        assert!(stream.current().is_empty());

        store.apply_categories(vec![category("c1", "Editors")]);

        let items = stream.changed().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(stream.current()[0].name, "Editors");
    }

    #[tokio::test]
    async fn into_stream_yields_whole_collections() {
        let store = CatalogStore::new();
        let mut stream = store.subscribe_categories().into_stream();

        // WatchStream yields the current value first.
        assert!(stream.next().await.unwrap().is_empty());

        store.apply_categories(vec![category("c1", "Editors"), category("c2", "Office")]);
        let items = stream.next().await.unwrap();
        let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Editors", "Office"]);
    }
}
