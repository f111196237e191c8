// ── Generic reactive keyed collection ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A lock-free, reactive collection keyed by string.
///
/// Uses `DashMap` for O(1) concurrent lookups and a `watch` channel for
/// push-based change notification. Mutations bump a version counter and
/// rebuild the snapshot that subscribers receive; batched writers can use
/// the `_silent` variants and a single [`flush`](Self::flush) so one poll
/// produces one notification instead of one per row.
pub(crate) struct KeyedCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: key string -> entity. Keys are client IPs here.
    by_key: DashMap<String, Arc<T>>,

    /// Version counter, bumped on every flush.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on flush for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> KeyedCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update an entity and notify subscribers.
    /// Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let is_new = self.upsert_silent(key, entity);
        self.flush();
        is_new
    }

    /// Insert or update without notifying. Callers must `flush()`.
    pub(crate) fn upsert_silent(&self, key: String, entity: T) -> bool {
        self.by_key.insert(key, Arc::new(entity)).is_none()
    }

    /// Remove an entity by key without notifying. Callers must `flush()`.
    pub(crate) fn remove_silent(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.remove(key).map(|(_, v)| v)
    }

    /// Rebuild the snapshot and wake subscribers.
    pub(crate) fn flush(&self) {
        let values: Vec<Arc<T>> = self.by_key.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }

    /// Look up an entity by its key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Return all current keys in the collection.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.by_key.iter().map(|r| r.key().clone()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_key() {
        let col: KeyedCollection<String> = KeyedCollection::new();
        assert!(col.upsert("10.0.0.1".into(), "hello".into()));
        assert!(!col.upsert("10.0.0.1".into(), "world".into()));
    }

    #[test]
    fn get_reflects_latest_value() {
        let col: KeyedCollection<String> = KeyedCollection::new();
        col.upsert("10.0.0.1".into(), "hello".into());
        col.upsert("10.0.0.1".into(), "world".into());
        assert_eq!(*col.get("10.0.0.1").unwrap(), "world");
    }

    #[test]
    fn silent_writes_batch_into_one_notification() {
        let col: KeyedCollection<String> = KeyedCollection::new();
        let mut rx = col.subscribe();

        col.upsert_silent("a".into(), "x".into());
        col.upsert_silent("b".into(), "y".into());
        assert!(!rx.has_changed().unwrap());

        col.flush();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
    }

    #[test]
    fn remove_silent_then_flush_updates_snapshot() {
        let col: KeyedCollection<String> = KeyedCollection::new();
        col.upsert("a".into(), "x".into());
        col.upsert("b".into(), "y".into());

        let removed = col.remove_silent("a");
        assert_eq!(*removed.unwrap(), "x");
        // Snapshot is stale until flushed.
        assert_eq!(col.snapshot().len(), 2);
        col.flush();
        assert_eq!(col.snapshot().len(), 1);
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn keys_lists_all_entries() {
        let col: KeyedCollection<String> = KeyedCollection::new();
        col.upsert("a".into(), "x".into());
        col.upsert("b".into(), "y".into());
        let mut keys = col.keys();
        keys.sort();
        assert_eq!(keys, ["a", "b"]);
    }
}
