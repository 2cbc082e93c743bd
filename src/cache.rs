//! Baseline cache for multi-document producers.
//!
//! Keeps the last-applied [`BlockSnapshot`] per document so a producer can
//! diff each document against its own baseline and bootstrap late-joining
//! previews.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::algo::EditScript;
use crate::message::SyncMessage;
use crate::transform::BlockSnapshot;

// =============================================================================
// Document Key
// =============================================================================

/// Cache key identifying one document (path or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(Arc<str>);

impl DocumentKey {
    /// Create a new key from a document path.
    pub fn new(path: &str) -> Self {
        Self(Arc::from(path))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Cache Entry
// =============================================================================

/// A cached baseline with version tracking.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The last-applied snapshot.
    pub snapshot: BlockSnapshot,
    /// Bumped on every update.
    pub version: u64,
}

impl CacheEntry {
    /// Create a new cache entry with version 0.
    pub fn new(snapshot: BlockSnapshot) -> Self {
        Self { snapshot, version: 0 }
    }

    /// Replace the snapshot and bump the version.
    pub fn update(&mut self, snapshot: BlockSnapshot) {
        self.snapshot = snapshot;
        self.version += 1;
    }
}

// =============================================================================
// Shared Cache
// =============================================================================

/// Non-thread-safe snapshot map.
pub type SnapshotCache = FxHashMap<DocumentKey, CacheEntry>;

/// Thread-safe shared snapshot cache.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshotCache {
    inner: Arc<RwLock<SnapshotCache>>,
}

impl SharedSnapshotCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a closure with read access to the cache.
    pub fn with_read<R>(&self, f: impl FnOnce(&SnapshotCache) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Execute a closure with write access to the cache.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut SnapshotCache) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Get a clone of a cached entry.
    pub fn get(&self, key: &DocumentKey) -> Option<CacheEntry> {
        self.with_read(|c| c.get(key).cloned())
    }

    /// Store a snapshot, bumping the version if the key exists.
    ///
    /// Returns the new version.
    pub fn store(&self, key: DocumentKey, snapshot: BlockSnapshot) -> u64 {
        self.with_write(|c| match c.get_mut(&key) {
            Some(entry) => {
                entry.update(snapshot);
                entry.version
            }
            None => {
                c.insert(key, CacheEntry::new(snapshot));
                0
            }
        })
    }

    /// Remove an entry from the cache.
    pub fn remove(&self, key: &DocumentKey) -> Option<CacheEntry> {
        self.with_write(|c| c.remove(key))
    }

    /// Check if the cache contains a key.
    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.with_read(|c| c.contains_key(key))
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.with_read(|c| c.len())
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.with_write(|c| c.clear());
    }

    /// Messages that bring a fresh preview of `key` up to date.
    ///
    /// Empty when the document was never synced.
    pub fn bootstrap(&self, key: &DocumentKey) -> Vec<SyncMessage> {
        self.with_read(|c| match c.get(key) {
            Some(entry) => vec![
                SyncMessage::Reload,
                SyncMessage::Edit(EditScript::insert_all(&entry.snapshot)),
            ],
            None => Vec::new(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, Element};
    use crate::transform::Indexer;

    fn snapshot(text: &str) -> BlockSnapshot {
        let doc = Document::from_blocks([Element::new("p").attr("data-line", "1").text(text).into()]);
        Indexer::default().index(&doc)
    }

    #[test]
    fn test_document_key() {
        let key = DocumentKey::new("/notes/todo.md");
        assert_eq!(key.as_str(), "/notes/todo.md");
        assert_eq!(key.to_string(), "/notes/todo.md");
    }

    #[test]
    fn test_shared_cache() {
        let cache = SharedSnapshotCache::new();
        let key = DocumentKey::new("/a.md");

        assert_eq!(cache.store(key.clone(), snapshot("one")), 0);
        assert_eq!(cache.store(key.clone(), snapshot("two")), 1);
        assert!(cache.contains(&key));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).map(|e| e.version), Some(1));

        cache.remove(&key);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let cache = SharedSnapshotCache::new();
        let other = cache.clone();
        other.store(DocumentKey::new("/b.md"), snapshot("x"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_bootstrap() {
        let cache = SharedSnapshotCache::new();
        let key = DocumentKey::new("/c.md");
        assert!(cache.bootstrap(&key).is_empty());

        cache.store(key.clone(), snapshot("hello"));
        let messages = cache.bootstrap(&key);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_reload());
        match &messages[1] {
            SyncMessage::Edit(script) => {
                assert_eq!(script.ops.len(), 1);
                assert_eq!(script.ops[0].content, "<p>hello</p>");
                assert_eq!(script.data_line_array, vec![Some(1)]);
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn test_cache_is_send_sync() {
        static_assertions::assert_impl_all!(SharedSnapshotCache: Send, Sync, Clone);
    }
}
