//! Favorites change notifications

use crossbeam_channel::{Receiver, Sender};
use std::fmt;

/// Outcome of a favorites mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Removed,
    /// The request matched the current state; nothing was written
    Unchanged,
}

impl Change {
    /// Whether the set was modified
    pub fn is_change(&self) -> bool {
        !matches!(self, Change::Unchanged)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Change::Added => "added",
            Change::Removed => "removed",
            Change::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// Event emitted to subscribers of the favorites manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    /// One item's favorite state flipped
    Changed { id: String, favorited: bool },
    /// The set was replaced by a newer stored record
    Reloaded { count: usize },
}

/// Fan-out of events to any number of subscribers
#[derive(Debug, Default)]
pub(crate) struct EventHub {
    subscribers: Vec<Sender<FavoritesEvent>>,
}

impl EventHub {
    pub(crate) fn subscribe(&mut self) -> Receiver<FavoritesEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber, forgetting disconnected ones
    pub(crate) fn emit(&mut self, event: FavoritesEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}
