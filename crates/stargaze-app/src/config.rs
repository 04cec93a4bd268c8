//! Configuration constants for stargaze app services

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "stargaze";
}

/// Feed-related configuration
pub mod feed {
    /// Astronomy Picture of the Day endpoint
    pub const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

    /// Shared rate-limited key accepted by the API
    pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

    /// Environment variable that overrides the stored API key
    pub const API_KEY_ENV: &str = "STARGAZE_API_KEY";

    /// Items requested per fetch
    pub const DEFAULT_COUNT: u32 = 10;

    /// Upper bound the API accepts for `count`
    pub const MAX_COUNT: u32 = 100;
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("Stargaze/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// UI-related configuration
pub mod ui {
    /// Banner shown after a favorite is added
    pub const MESSAGE_ADDED: &str = "ADDED!";

    /// Banner shown after a favorite is removed
    pub const MESSAGE_REMOVED: &str = "DELETED!";

    /// How long a banner stays visible, in milliseconds
    pub const BANNER_MILLIS: u64 = 2000;

    /// Shown in place of cards when there are no favorites
    pub const EMPTY_FAVORITES: &str = "No favorites yet!";
}
