//! Shared gallery state and commands
//!
//! `AppCommand` is the command type sent by any frontend.
//! `GallerySnapshot` is what a frontend renders.

use std::borrow::Cow;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use stargaze::item::Item;

/// Which collection is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The latest fetched batch
    #[default]
    Results,
    /// Everything the user has favorited
    Favorites,
}

impl View {
    /// The other view
    pub fn toggled(self) -> Self {
        match self {
            View::Results => View::Favorites,
            View::Favorites => View::Results,
        }
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            View::Results => "Results",
            View::Favorites => "Favorites",
        }
    }
}

/// Commands sent by any frontend
#[derive(Debug)]
pub enum AppCommand {
    /// Fetch a new batch and show it
    Fetch,
    ShowView(View),
    /// Favorite or unfavorite an item by id
    Toggle(String),
    /// Pick up favorites changed outside this session
    Refresh,
    Shutdown,

    // Internal: fetch finished on worker thread (not sent by frontends)
    InternalFeedFetched {
        generation: u64,
        result: Result<Vec<Item>, String>,
    },
}

/// One rendered item with its heart state
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub item: Item,
    /// Filled heart when true, outlined when false
    pub favorited: bool,
}

/// Transient confirmation message
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: &'static str,
    pub expires_at: Instant,
}

impl Banner {
    /// Whether the banner should still be shown at `now`
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Snapshot of gallery state read by frontends
#[derive(Debug, Clone)]
pub struct GallerySnapshot {
    pub view: View,
    /// Cards for the current view, in display order
    pub cards: Vec<Card>,
    /// True while a fetch is in flight
    pub loading: bool,
    pub banner: Option<Banner>,
    /// Set instead of cards when the favorites view has nothing to show
    pub empty_message: Option<&'static str>,
    pub favorites_count: usize,
    /// Fetch and feed status
    pub status_text: Cow<'static, str>,
    /// True when status_text describes a failure
    pub is_error: bool,
    /// Favorites problem (unreadable record, failed save, unknown id).
    /// Stays until the next successful favorites write.
    pub warning: Option<Cow<'static, str>>,
}

impl Default for GallerySnapshot {
    fn default() -> Self {
        Self {
            view: View::default(),
            cards: Vec::new(),
            loading: false,
            banner: None,
            empty_message: None,
            favorites_count: 0,
            status_text: Cow::Borrowed("Ready"),
            is_error: false,
            warning: None,
        }
    }
}

impl GallerySnapshot {
    /// Card for an item id, if it is on screen
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_view_toggle() {
        assert_eq!(View::Results.toggled(), View::Favorites);
        assert_eq!(View::Favorites.toggled(), View::Results);
        assert_eq!(View::default(), View::Results);
    }

    #[test]
    fn test_view_serde_names() {
        assert_eq!(serde_json::to_string(&View::Favorites).unwrap(), "\"favorites\"");
        let view: View = serde_json::from_str("\"results\"").unwrap();
        assert_eq!(view, View::Results);
    }

    #[test]
    fn test_banner_visibility() {
        let now = Instant::now();
        let banner = Banner {
            message: "ADDED!",
            expires_at: now + Duration::from_secs(2),
        };
        assert!(banner.is_visible_at(now));
        assert!(!banner.is_visible_at(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_card_lookup() {
        let snapshot = GallerySnapshot {
            cards: vec![Card {
                item: Item::image("u1", "A", "2024-01-01"),
                favorited: true,
            }],
            ..Default::default()
        };
        assert!(snapshot.card("u1").unwrap().favorited);
        assert!(snapshot.card("u2").is_none());
    }
}
