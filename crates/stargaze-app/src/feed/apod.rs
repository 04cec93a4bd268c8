//! Astronomy Picture of the Day feed
//!
//! Implementation of `FeedSource` for NASA's APOD API
//! (<https://api.nasa.gov/>), requesting a random batch with `count`.

use crate::config::feed::{APOD_ENDPOINT, DEFAULT_API_KEY, MAX_COUNT};
use crate::error::{AppError, Result};
use crate::network::{HttpClient, HttpResponse};

use super::traits::FeedSource;

use serde::Deserialize;
use serde_json::Value;
use stargaze::item::{Item, MediaType};
use tracing::{debug, info};

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApodEntry {
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    hdurl: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    copyright: Option<String>,
}

impl ApodEntry {
    /// Convert to an `Item`, or `None` for entries the viewer cannot show
    fn into_item(self) -> Option<Item> {
        let media_type = match self.media_type.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            other => {
                debug!("Skipping {} entry with media type '{}'", self.date, other);
                return None;
            }
        };

        let url = match self.url {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                debug!("Skipping {} entry without a url", self.date);
                return None;
            }
        };

        Some(Item {
            media_type,
            url,
            hdurl: self.hdurl.filter(|u| !u.trim().is_empty()),
            title: self.title,
            explanation: self.explanation,
            date: self.date,
            copyright: self.copyright.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// Pull a human-readable message out of an API error object
fn error_message(value: &Value) -> Option<String> {
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .or_else(|| error.get("code").and_then(Value::as_str))?;
        return Some(message.to_string());
    }
    value.get("msg").and_then(Value::as_str).map(str::to_string)
}

/// Turn an APOD response into items
///
/// Accepts the array returned for `count` requests as well as the single
/// object returned without it.
pub fn parse_response(resp: &HttpResponse) -> Result<Vec<Item>> {
    let value: Value = match resp.json() {
        Ok(value) => value,
        Err(e) if resp.is_success() => {
            return Err(AppError::Feed(format!("Invalid response from server: {}", e)));
        }
        Err(_) => return Err(AppError::Feed(format!("Server returned {}", resp.status))),
    };

    if let Some(message) = error_message(&value) {
        return Err(AppError::Feed(message));
    }
    if !resp.is_success() {
        return Err(AppError::Feed(format!("Server returned {}", resp.status)));
    }

    let entries: Vec<ApodEntry> = match value {
        Value::Array(_) => serde_json::from_value::<Vec<ApodEntry>>(value),
        Value::Object(_) => serde_json::from_value::<ApodEntry>(value).map(|entry| vec![entry]),
        _ => {
            return Err(AppError::Feed(
                "Invalid response from server: expected a list of entries".to_string(),
            ))
        }
    }
    .map_err(|e| AppError::Feed(format!("Invalid response from server: {}", e)))?;

    Ok(entries.into_iter().filter_map(ApodEntry::into_item).collect())
}

// =============================================================================
// ApodFeed
// =============================================================================

/// NASA APOD feed
pub struct ApodFeed {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApodFeed {
    /// Create a feed against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(APOD_ENDPOINT, api_key)
    }

    /// Create a feed with the shared demo key
    pub fn demo() -> Result<Self> {
        Self::new(DEFAULT_API_KEY)
    }

    /// Create a feed with a custom endpoint (for testing or mirrors)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into(),
            api_key,
        })
    }
}

impl FeedSource for ApodFeed {
    fn name(&self) -> &'static str {
        "NASA APOD"
    }

    fn id(&self) -> &'static str {
        "apod"
    }

    fn fetch(&self, count: u32) -> Result<Vec<Item>> {
        let count = count.clamp(1, MAX_COUNT).to_string();
        let resp = self.client.get(
            &self.base_url,
            &[("api_key", self.api_key.as_str()), ("count", count.as_str())],
        )?;
        let items = parse_response(&resp)?;
        info!("Fetched {} items from {}", items.len(), self.name());
        Ok(items)
    }
}
