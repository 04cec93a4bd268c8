//! Stargaze: favorites core for a daily astronomy picture viewer
//!
//! Catalog of the latest fetched items, the authoritative favorites set,
//! and the storage port that keeps the two in step with durable storage.
//!
//! ## Quick start
//!
//! ```
//! use stargaze::catalog::CatalogStore;
//! use stargaze::favorites::{Change, FavoritesManager};
//! use stargaze::item::Item;
//! use stargaze::storage::MemoryStore;
//!
//! let catalog = CatalogStore::from_items(vec![Item::image("u1", "A", "2024-01-01")]);
//! let (mut favorites, warning) = FavoritesManager::open(MemoryStore::new(), catalog);
//! assert!(warning.is_none());
//! assert_eq!(favorites.toggle("u1").unwrap(), Change::Added);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod item;
pub mod storage;
