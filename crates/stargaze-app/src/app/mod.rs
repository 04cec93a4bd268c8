//! Gallery state and controller
//!
//! Keeps what a renderer shows in step with the catalog and favorites.

pub mod controller;
pub mod state;

pub use controller::GalleryController;
pub use state::{AppCommand, Banner, Card, GallerySnapshot, View};
