//! Durable storage port
//!
//! A key-value string store addressed by a fixed key. The favorites manager
//! owns the serialization format; backends only move strings.

use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Result type for storage backends
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A string store scoped to the application
///
/// Reads and writes are synchronous from the caller's point of view.
/// Failures come back as ordinary errors.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if nothing is stored
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`
    fn store(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).store(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).store(key, value)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    fail_writes: bool,
}

/// In-memory store
///
/// Useful as an ephemeral backend and for tests. Writes can be made to fail
/// on demand to exercise the write-failure path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one value already present
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().values.insert(key.to_string(), value.into());
        store
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Overwrite a value directly, bypassing the failure switch
    ///
    /// Stands in for another window editing the same key.
    pub fn put_external(&self, key: &str, value: impl Into<String>) {
        self.lock().values.insert(key.to_string(), value.into());
    }

    /// Current raw value under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Write(format!(
                "memory store is rejecting writes to '{}'",
                key
            )));
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.load("nope").unwrap(), None);
    }

    #[test]
    fn test_store_and_load() {
        let store = MemoryStore::new();
        store.store("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));

        store.store("k", "w").unwrap();
        assert_eq!(store.raw("k").as_deref(), Some("w"));
    }

    #[test]
    fn test_failing_writes_keep_old_value() {
        let store = MemoryStore::with_value("k", "old");
        store.set_fail_writes(true);

        let err = store.store("k", "new").unwrap_err();
        assert!(matches!(err, StorageError::Write(_)));
        assert_eq!(store.raw("k").as_deref(), Some("old"));

        store.set_fail_writes(false);
        store.store("k", "new").unwrap();
        assert_eq!(store.raw("k").as_deref(), Some("new"));
    }

    #[test]
    fn test_shared_through_arc() {
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<MemoryStore> = Arc::clone(&store);
        handle.store("k", "v").unwrap();
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }
}
