//! Application settings management
//!
//! User preferences for the feed and the viewer.

use crate::app::View;
use crate::config::feed::{API_KEY_ENV, DEFAULT_API_KEY, DEFAULT_COUNT, MAX_COUNT};
use crate::data::storage;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings data file name
const SETTINGS_FILE: &str = "settings.json";

/// Settings file format version for migrations
const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    // === Feed ===
    /// API key sent with every feed request
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Number of items per fetch
    #[serde(default = "default_count")]
    pub count: u32,

    // === Viewer ===
    /// View shown once the first fetch completes
    #[serde(default)]
    pub start_view: View,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            api_key: default_api_key(),
            count: default_count(),
            start_view: View::default(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings file inside a data directory
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }

    /// Load settings from a specific path, defaults if the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = match storage::load_json::<Settings>(path)? {
            Some(settings) => settings,
            None => Self::default(),
        };
        settings.set_count(settings.count);
        Ok(settings)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        storage::save_json(path, self)
    }

    /// Set items per fetch (clamped to 1 - MAX_COUNT)
    pub fn set_count(&mut self, count: u32) {
        self.count = count.clamp(1, MAX_COUNT);
    }

    /// API key after applying the environment override
    pub fn effective_api_key(&self) -> String {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_override(&self, env_key: Option<String>) -> String {
        match env_key {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => self.api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        temp_dir().join(format!(
            "stargaze_settings_test_{}_{}.json",
            std::process::id(),
            id
        ))
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_key, "DEMO_KEY");
        assert_eq!(settings.count, 10);
        assert_eq!(settings.start_view, View::Results);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(&temp_path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path();
        fs::write(&path, r#"{"start_view":"favorites"}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.start_view, View::Favorites);
        assert_eq!(settings.count, 10);
        assert_eq!(settings.api_key, "DEMO_KEY");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path();
        let mut settings = Settings::new();
        settings.api_key = "abc123".to_string();
        settings.set_count(25);
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_count_is_clamped() {
        let mut settings = Settings::new();
        settings.set_count(0);
        assert_eq!(settings.count, 1);
        settings.set_count(500);
        assert_eq!(settings.count, 100);

        let path = temp_path();
        fs::write(&path, r#"{"count":1000}"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().count, 100);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_api_key_override() {
        let settings = Settings::new();
        assert_eq!(settings.api_key_with_override(None), "DEMO_KEY");
        assert_eq!(settings.api_key_with_override(Some("  ".into())), "DEMO_KEY");
        assert_eq!(settings.api_key_with_override(Some(" mine ".into())), "mine");
    }
}
