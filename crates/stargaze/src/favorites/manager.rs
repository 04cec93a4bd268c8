//! Favorites management
//!
//! Single owner of the favorites set. Every mutation goes through here and
//! is written through to storage before returning.

use crate::catalog::CatalogStore;
use crate::config::storage::FAVORITES_KEY;
use crate::error::{FavoritesError, Result, StorageError};
use crate::item::Item;
use crate::storage::{KeyValueStore, StorageResult};
use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use super::events::{Change, EventHub, FavoritesEvent};
use super::set::FavoritesSet;

/// Manages favorites against a storage backend and the current catalog
///
/// Adding requires the id to resolve in the catalog; favorites outlive the
/// catalog that produced them.
pub struct FavoritesManager<S: KeyValueStore> {
    store: S,
    catalog: CatalogStore,
    favorites: FavoritesSet,
    /// Memory holds changes the last write failed to persist
    unsaved: bool,
    events: EventHub,
}

impl<S: KeyValueStore> FavoritesManager<S> {
    /// Load favorites from `store`
    ///
    /// An absent record starts empty. An unreadable one also starts empty,
    /// and the `CorruptState` error is handed back so the caller can warn.
    pub fn open(store: S, catalog: CatalogStore) -> (Self, Option<FavoritesError>) {
        let mut manager = Self {
            store,
            catalog,
            favorites: FavoritesSet::new(),
            unsaved: false,
            events: EventHub::default(),
        };

        let warning = match read_record(&manager.store) {
            Ok(Some(favorites)) => {
                debug!("Loaded {} favorites", favorites.len());
                manager.favorites = favorites;
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("{}", e);
                Some(e)
            }
        };

        (manager, warning)
    }

    /// Check if an id is favorited (O(1))
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Add an item from the current catalog
    ///
    /// Re-adding an existing favorite is a no-op.
    pub fn add(&mut self, id: &str) -> Result<Change> {
        if self.favorites.contains(id) {
            return Ok(Change::Unchanged);
        }

        let item = self
            .catalog
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| FavoritesError::NotFound(id.to_string()))?;

        self.favorites.insert(id, item);
        self.commit(id, Change::Added)
    }

    /// Remove a favorite; removing a non-favorite is a no-op
    pub fn remove(&mut self, id: &str) -> Result<Change> {
        if self.favorites.remove(id).is_none() {
            return Ok(Change::Unchanged);
        }
        self.commit(id, Change::Removed)
    }

    /// Flip favorite status for an id
    pub fn toggle(&mut self, id: &str) -> Result<Change> {
        if self.is_favorite(id) {
            self.remove(id)
        } else {
            self.add(id)
        }
    }

    /// Snapshot of favorites in insertion order
    ///
    /// Re-reads storage first so edits made elsewhere to the same key show
    /// up. Never goes behind a local change that has not been persisted.
    pub fn list(&mut self) -> Vec<Item> {
        self.refresh();
        self.favorites.iter().cloned().collect()
    }

    /// Adopt the stored record if it differs from memory
    ///
    /// Returns true when the in-memory set was replaced.
    pub fn refresh(&mut self) -> bool {
        if self.unsaved {
            debug!("Skipping favorites reload: local changes are not persisted");
            return false;
        }

        let stored = match read_record(&self.store) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("Keeping in-memory favorites: {}", e);
                return false;
            }
        };

        if stored == self.favorites {
            return false;
        }

        debug!(
            "Favorites changed in storage ({} -> {})",
            self.favorites.len(),
            stored.len()
        );
        self.favorites = stored;
        self.events.emit(FavoritesEvent::Reloaded {
            count: self.favorites.len(),
        });
        true
    }

    /// Write the set again if an earlier write failed
    pub fn flush(&mut self) -> StorageResult<()> {
        if !self.unsaved {
            return Ok(());
        }
        self.persist()
    }

    /// Whether memory holds changes that failed to persist
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Get a favorite by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.favorites.get(id)
    }

    /// Current set without touching storage
    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Get number of favorites
    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Receive a `FavoritesEvent` for every change from now on
    pub fn subscribe(&mut self) -> Receiver<FavoritesEvent> {
        self.events.subscribe()
    }

    /// The catalog adds are resolved against
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Swap in a freshly fetched batch; favorites are untouched
    pub fn replace_catalog(&mut self, items: Vec<Item>) {
        self.catalog.replace(items);
    }

    fn commit(&mut self, id: &str, change: Change) -> Result<Change> {
        let persisted = self.persist();

        self.events.emit(FavoritesEvent::Changed {
            id: id.to_string(),
            favorited: change == Change::Added,
        });

        match persisted {
            Ok(()) => Ok(change),
            Err(reason) => {
                warn!("Favorite '{}' {} in memory only: {}", id, change, reason);
                Err(FavoritesError::StorageWriteFailed {
                    id: id.to_string(),
                    change,
                    reason,
                })
            }
        }
    }

    fn persist(&mut self) -> StorageResult<()> {
        let json = self
            .favorites
            .to_json()
            .map_err(|e| StorageError::Write(format!("Failed to serialize favorites: {}", e)))?;

        match self.store.store(FAVORITES_KEY, &json) {
            Ok(()) => {
                self.unsaved = false;
                debug!("Saved {} favorites", self.favorites.len());
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                Err(e)
            }
        }
    }
}

/// Read and parse the stored record; blank counts as absent
fn read_record<S: KeyValueStore>(store: &S) -> Result<Option<FavoritesSet>> {
    let raw = store
        .load(FAVORITES_KEY)
        .map_err(|e| FavoritesError::CorruptState(e.to_string()))?;

    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    FavoritesSet::from_json(&raw)
        .map(Some)
        .map_err(|e| FavoritesError::CorruptState(format!("'{}': {}", FAVORITES_KEY, e)))
}
