//! Gallery controller
//!
//! Owns the favorites manager and the feed, and processes commands from
//! frontends through a single crossbeam channel. Feed fetches run on a
//! worker thread and come back as `InternalFeedFetched`.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use stargaze::catalog::CatalogStore;
use stargaze::error::FavoritesError;
use stargaze::favorites::{Change, FavoritesEvent, FavoritesManager};
use stargaze::item::Item;
use stargaze::storage::KeyValueStore;

use super::state::{AppCommand, Banner, Card, GallerySnapshot, View};
use crate::config::ui::{BANNER_MILLIS, EMPTY_FAVORITES, MESSAGE_ADDED, MESSAGE_REMOVED};
use crate::feed::FeedSource;

pub struct GalleryController<S: KeyValueStore> {
    cmd_rx: Receiver<AppCommand>,
    cmd_tx: Sender<AppCommand>,
    favorites: FavoritesManager<S>,
    favorite_events: Receiver<FavoritesEvent>,
    feed: Arc<dyn FeedSource>,
    count: u32,
    /// Monotonically increasing counter to discard stale fetch results
    fetch_generation: u64,
    /// Whether the in-flight fetch should bring the results view forward
    show_results_on_fetch: bool,
    snapshot: GallerySnapshot,
    running: bool,
}

impl<S: KeyValueStore> GalleryController<S> {
    /// Open favorites from `store` and show `start_view`
    ///
    /// A corrupt favorites record is reported through the status line.
    pub fn new(store: S, feed: Arc<dyn FeedSource>, count: u32, start_view: View) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (mut favorites, warning) = FavoritesManager::open(store, CatalogStore::new());
        let favorite_events = favorites.subscribe();

        let mut controller = Self {
            cmd_rx,
            cmd_tx,
            favorites,
            favorite_events,
            feed,
            count,
            fetch_generation: 0,
            show_results_on_fetch: false,
            snapshot: GallerySnapshot::default(),
            running: true,
        };

        if let Some(warning) = warning {
            controller.snapshot.warning = Some(warning.to_string().into());
        }
        controller.show_view(start_view);
        controller
    }

    /// Sender for commands from other threads or frontends
    pub fn sender(&self) -> Sender<AppCommand> {
        self.cmd_tx.clone()
    }

    /// Current state to render
    pub fn snapshot(&self) -> &GallerySnapshot {
        &self.snapshot
    }

    /// The favorites manager, for read-only queries
    pub fn favorites(&self) -> &FavoritesManager<S> {
        &self.favorites
    }

    /// False once `Shutdown` has been handled
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Kick off the first fetch without leaving the current view
    pub fn start(&mut self) {
        self.start_fetch(false);
    }

    /// Handle every queued command. Returns false once shut down.
    pub fn pump(&mut self) -> bool {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            if self.handle_command(cmd) {
                self.running = false;
            }
        }
        self.running
    }

    /// Block until the in-flight fetch lands or `timeout` passes
    ///
    /// Returns true if nothing is loading any more.
    pub fn wait_for_fetch(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.snapshot.loading && self.running {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.cmd_rx.recv_timeout(remaining) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        self.running = false;
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        !self.snapshot.loading
    }

    /// Expire the banner once its time is up
    pub fn tick(&mut self, now: Instant) {
        if let Some(banner) = &self.snapshot.banner {
            if !banner.is_visible_at(now) {
                self.snapshot.banner = None;
            }
        }
    }

    /// Handle a single command. Returns true if the loop should exit.
    pub fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Shutdown => return true,

            AppCommand::Fetch => self.start_fetch(true),
            AppCommand::ShowView(view) => self.show_view(view),
            AppCommand::Toggle(id) => self.toggle(&id),
            AppCommand::Refresh => {
                self.favorites.refresh();
                self.sync_with_favorites();
            }
            AppCommand::InternalFeedFetched { generation, result } => {
                self.on_feed_fetched(generation, result);
            }
        }
        false
    }

    fn start_fetch(&mut self, show_results: bool) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        self.show_results_on_fetch = show_results;
        self.snapshot.loading = true;
        self.set_status("Loading...");

        let feed = Arc::clone(&self.feed);
        let tx = self.cmd_tx.clone();
        let count = self.count;

        let spawned = std::thread::Builder::new()
            .name("feed-fetch".into())
            .spawn(move || {
                let result = feed.fetch(count).map_err(|e| e.to_string());
                let _ = tx.send(AppCommand::InternalFeedFetched { generation, result });
            });

        if let Err(e) = spawned {
            self.snapshot.loading = false;
            self.set_error(format!("Fetch failed: {e}"));
        }
    }

    fn on_feed_fetched(&mut self, generation: u64, result: Result<Vec<Item>, String>) {
        if generation != self.fetch_generation {
            debug!("Discarding stale fetch result (generation {generation})");
            return;
        }
        self.snapshot.loading = false;

        match result {
            Ok(items) => {
                info!("Catalog replaced with {} items", items.len());
                let count = items.len();
                self.favorites.replace_catalog(items);
                self.set_status(format!("{} from {}", plural(count, "item"), self.feed.name()));
                if self.show_results_on_fetch {
                    self.show_view(View::Results);
                } else {
                    self.rebuild_cards();
                }
            }
            Err(e) => {
                // Catalog and favorites stay as they were
                warn!("Fetch from {} failed: {}", self.feed.name(), e);
                self.set_error(format!("Fetch failed: {e}"));
            }
        }
    }

    fn show_view(&mut self, view: View) {
        self.snapshot.view = view;
        self.rebuild_cards();
    }

    fn toggle(&mut self, id: &str) {
        let result = self.favorites.toggle(id);
        self.sync_with_favorites();

        match result {
            Ok(change) => {
                // A successful write leaves a valid record behind
                if change.is_change() {
                    self.snapshot.warning = None;
                }
                self.show_banner(change);
            }
            Err(FavoritesError::StorageWriteFailed { change, reason, .. }) => {
                self.show_banner(change);
                self.snapshot.warning = Some(
                    format!("Favorite {change}, but it may not survive a restart: {reason}").into(),
                );
            }
            Err(e) => self.snapshot.warning = Some(e.to_string().into()),
        }
    }

    /// Apply pending favorites events to the cards on screen
    fn sync_with_favorites(&mut self) {
        let events: Vec<_> = self.favorite_events.try_iter().collect();
        let mut reloaded = false;

        for event in events {
            match event {
                FavoritesEvent::Changed { id, favorited } => self.sync_card(&id, favorited),
                FavoritesEvent::Reloaded { .. } => reloaded = true,
            }
        }

        if reloaded {
            self.rebuild_cards();
        }
        self.snapshot.favorites_count = self.favorites.count();
    }

    /// Update only the card for `id`
    fn sync_card(&mut self, id: &str, favorited: bool) {
        match self.snapshot.view {
            View::Results => {
                if let Some(card) = self.snapshot.cards.iter_mut().find(|c| c.item.id() == id) {
                    card.favorited = favorited;
                }
            }
            View::Favorites => {
                if favorited {
                    if let Some(item) = self.favorites.get(id) {
                        if self.snapshot.card(id).is_none() {
                            self.snapshot.cards.push(Card {
                                item: item.clone(),
                                favorited: true,
                            });
                        }
                    }
                } else {
                    self.snapshot.cards.retain(|c| c.item.id() != id);
                }
                self.update_empty_state();
            }
        }
    }

    fn rebuild_cards(&mut self) {
        self.snapshot.cards = match self.snapshot.view {
            View::Results => self
                .favorites
                .catalog()
                .items()
                .iter()
                .map(|item| Card {
                    item: item.clone(),
                    favorited: self.favorites.is_favorite(item.id()),
                })
                .collect(),
            View::Favorites => self
                .favorites
                .list()
                .into_iter()
                .map(|item| Card {
                    item,
                    favorited: true,
                })
                .collect(),
        };

        // A reload seen while listing is already reflected above
        self.favorite_events.try_iter().for_each(drop);

        self.snapshot.favorites_count = self.favorites.count();
        self.update_empty_state();
    }

    fn update_empty_state(&mut self) {
        self.snapshot.empty_message =
            if self.snapshot.view == View::Favorites && self.snapshot.cards.is_empty() {
                Some(EMPTY_FAVORITES)
            } else {
                None
            };
    }

    fn show_banner(&mut self, change: Change) {
        let message = match change {
            Change::Added => MESSAGE_ADDED,
            Change::Removed => MESSAGE_REMOVED,
            Change::Unchanged => return,
        };
        self.snapshot.banner = Some(Banner {
            message,
            expires_at: Instant::now() + Duration::from_millis(BANNER_MILLIS),
        });
    }

    fn set_status(&mut self, text: impl Into<Cow<'static, str>>) {
        self.snapshot.status_text = text.into();
        self.snapshot.is_error = false;
    }

    fn set_error(&mut self, text: impl Into<Cow<'static, str>>) {
        self.snapshot.status_text = text.into();
        self.snapshot.is_error = true;
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
