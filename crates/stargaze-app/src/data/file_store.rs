//! File-backed key-value store
//!
//! Each key lives in its own JSON file under one directory.

use crate::data::storage;
use crate::error::Result;
use stargaze::error::StorageError;
use stargaze::storage::{KeyValueStore, StorageResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `KeyValueStore` over a directory of `<key>.json` files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store files in the default config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(storage::config_dir()?))
    }

    /// Directory the files live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Read(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        storage::read_text(&path).map_err(|e| StorageError::Read(e.to_string()))
    }

    fn store(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self
            .path_for(key)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        storage::replace_text(&path, value).map_err(|e| StorageError::Write(e.to_string()))?;
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stargaze::catalog::CatalogStore;
    use stargaze::config::storage::FAVORITES_KEY;
    use stargaze::favorites::{Change, FavoritesManager};
    use stargaze::item::Item;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> FileStore {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        FileStore::new(temp_dir().join(format!(
            "stargaze_store_test_{}_{}",
            std::process::id(),
            id
        )))
    }

    #[test]
    fn test_load_missing() {
        let store = temp_store();
        assert_eq!(store.load(FAVORITES_KEY).unwrap(), None);
    }

    #[test]
    fn test_store_then_load() {
        let store = temp_store();
        store.store(FAVORITES_KEY, "{}").unwrap();
        assert_eq!(store.load(FAVORITES_KEY).unwrap().as_deref(), Some("{}"));
        assert!(store.dir().join("nasaFavorites.json").exists());

        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = temp_store();
        assert!(store.load("../escape").is_err());
        assert!(matches!(store.store("a/b", "x"), Err(StorageError::Write(_))));
        assert!(store.load("").is_err());
    }

    #[test]
    fn test_favorites_survive_reopen() {
        let store = temp_store();
        let catalog = || {
            CatalogStore::from_items(vec![
                Item::image("u1", "A", "2024-01-01"),
                Item::image("u2", "B", "2024-01-02"),
            ])
        };

        {
            let (mut manager, warning) = FavoritesManager::open(store.clone(), catalog());
            assert!(warning.is_none());
            assert_eq!(manager.toggle("u2").unwrap(), Change::Added);
            assert_eq!(manager.toggle("u1").unwrap(), Change::Added);
        }

        let (mut manager, _) = FavoritesManager::open(store.clone(), CatalogStore::new());
        let titles: Vec<_> = manager.list().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["B", "A"]);

        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_failed_write_keeps_existing_favorites() {
        let store = temp_store();
        let catalog = CatalogStore::from_items(vec![
            Item::image("u1", "A", "2024-01-01"),
            Item::image("u2", "B", "2024-01-02"),
        ]);
        let (mut manager, _) = FavoritesManager::open(store.clone(), catalog);
        assert_eq!(manager.toggle("u1").unwrap(), Change::Added);
        let before = store.load(FAVORITES_KEY).unwrap();

        // Block the staging file so the next write cannot land
        let staged = store.dir().join("nasaFavorites.json.tmp");
        fs::create_dir_all(&staged).unwrap();
        assert!(manager.toggle("u2").is_err());
        assert!(manager.is_favorite("u2"));
        assert_eq!(store.load(FAVORITES_KEY).unwrap(), before);

        let (reopened, warning) = FavoritesManager::open(store.clone(), CatalogStore::new());
        assert!(warning.is_none());
        assert!(reopened.is_favorite("u1"));

        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let store = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for(FAVORITES_KEY).unwrap(), "{not json").unwrap();

        let (manager, warning) = FavoritesManager::open(store.clone(), CatalogStore::new());
        assert!(warning.is_some());
        assert!(manager.is_empty());

        let _ = fs::remove_dir_all(store.dir());
    }
}
