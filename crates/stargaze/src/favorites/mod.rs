//! Favorites
//!
//! The authoritative favorites set, its persisted form, and the change
//! events consumed by renderers.

pub mod events;
pub mod manager;
pub mod set;

pub use events::{Change, FavoritesEvent};
pub use manager::FavoritesManager;
pub use set::FavoritesSet;
