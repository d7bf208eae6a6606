use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

/// Raw response body, or `None` when the API answered with a non-success
/// status.
pub type Body = Option<Arc<str>>;

/// One cached request. Concurrent fetches of the same path share the cell,
/// so only one of them reaches the network.
pub type Slot = Arc<OnceCell<Body>>;

/// Bounded memo of raw responses keyed by request path.
pub struct RequestCache {
    entries: Mutex<LruCache<String, Slot>>,
}

impl RequestCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        RequestCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Slot>> {
        // A panic while holding the lock cannot leave the map inconsistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The slot for `path`, created empty on first use.
    pub fn slot(&self, path: &str) -> Slot {
        let mut entries = self.lock();
        if let Some(slot) = entries.get(path) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        entries.put(path.to_owned(), Arc::clone(&slot));
        slot
    }

    pub fn evict(&self, path: &str) {
        self.lock().pop(path);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
