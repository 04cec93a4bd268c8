//! Feed source trait
//!
//! Defines the interface that every upstream media feed must implement.

use crate::error::Result;
use stargaze::item::Item;

/// A source of dated media items
///
/// Implementations perform one best-effort fetch per call. A failed fetch
/// returns an error and produces no partial batch.
pub trait FeedSource: Send + Sync {
    /// Display name for the feed (e.g., "NASA APOD")
    fn name(&self) -> &'static str;

    /// Machine-readable identifier (e.g., "apod")
    fn id(&self) -> &'static str;

    /// Fetch a batch of `count` items, in feed order
    fn fetch(&self, count: u32) -> Result<Vec<Item>>;
}
