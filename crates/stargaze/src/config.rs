//! Configuration constants for the stargaze core

/// Persistence-related configuration
pub mod storage {
    /// Fixed namespace key the favorites record is stored under
    pub const FAVORITES_KEY: &str = "nasaFavorites";
}
