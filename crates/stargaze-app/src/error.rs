//! Error types for stargaze app services
//!
//! Application-level errors that wrap core errors and add app-specific variants.

use stargaze::error::{FavoritesError, StorageError};
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(String),
}

/// Result type alias for stargaze app services
pub type Result<T> = std::result::Result<T, AppError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {}", url.as_str());
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    if let Some(status) = e.status() {
        return format!("Server returned {}", status);
    }
    format!("Network error: {e}")
}
