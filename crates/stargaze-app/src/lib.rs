//! Stargaze App Services
//!
//! Feed sources, file persistence, settings and the gallery controller.
//! Depends on the `stargaze` core crate.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod feed;
pub mod network;
