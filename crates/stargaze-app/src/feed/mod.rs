//! Upstream media feeds
//!
//! Sources the catalog is filled from.

pub mod apod;
pub mod traits;

// Re-exports
pub use apod::ApodFeed;
pub use traits::FeedSource;
