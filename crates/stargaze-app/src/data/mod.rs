//! Data persistence
//!
//! Handles the file-backed favorites store and settings.

pub mod file_store;
pub mod settings;
pub mod storage;

// Re-export common types
pub use file_store::FileStore;
pub use settings::Settings;
pub use storage::config_dir;
