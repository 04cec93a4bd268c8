//! Media item types
//!
//! One daily media entry as delivered by the feed. Items are immutable once
//! received; collections only ever change which items they hold.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// MediaType
// =============================================================================

/// Kind of media an item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Lowercase wire name ("image" / "video")
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item
// =============================================================================

/// A single daily media entry
///
/// Field names follow the feed's wire format so the persisted favorites
/// record keeps the same shape as the feed response. The `url` doubles as
/// the stable identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Image or video
    pub media_type: MediaType,
    /// Canonical media URL (also the item id)
    pub url: String,
    /// High resolution image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Long description
    #[serde(default)]
    pub explanation: String,
    /// Publication date (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    /// Copyright holder, absent for public domain entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Item {
    /// Create an item with the minimal fields
    pub fn new(
        media_type: MediaType,
        url: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            media_type,
            url: url.into(),
            hdurl: None,
            title: title.into(),
            explanation: String::new(),
            date: date.into(),
            copyright: None,
        }
    }

    /// Create an image item
    pub fn image(url: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self::new(MediaType::Image, url, title, date)
    }

    /// Create a video item
    pub fn video(url: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self::new(MediaType::Video, url, title, date)
    }

    /// Set the high resolution URL
    pub fn with_hd_url(mut self, hdurl: impl Into<String>) -> Self {
        self.hdurl = Some(hdurl.into());
        self
    }

    /// Set the copyright holder
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Set the explanation text
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Stable identifier of this item
    pub fn id(&self) -> &str {
        &self.url
    }

    /// Whether this is an image entry
    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }

    /// URL a viewer should open: the full image when one exists
    pub fn display_url(&self) -> &str {
        match (&self.media_type, &self.hdurl) {
            (MediaType::Image, Some(hd)) => hd,
            _ => &self.url,
        }
    }

    /// Date followed by the copyright holder, if any
    pub fn credit(&self) -> String {
        match &self.copyright {
            Some(holder) => format!("{} {}", self.date, holder.trim()),
            None => self.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_url() {
        let item = Item::image("https://apod.nasa.gov/a.jpg", "A", "2024-01-01");
        assert_eq!(item.id(), "https://apod.nasa.gov/a.jpg");
    }

    #[test]
    fn test_deserialize_feed_entry() {
        let json = r#"{
            "copyright": "Jane Doe",
            "date": "2024-01-01",
            "explanation": "A galaxy.",
            "hdurl": "https://apod.nasa.gov/a_hd.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "Galaxy",
            "url": "https://apod.nasa.gov/a.jpg"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.media_type, MediaType::Image);
        assert_eq!(item.hdurl.as_deref(), Some("https://apod.nasa.gov/a_hd.jpg"));
        assert_eq!(item.copyright.as_deref(), Some("Jane Doe"));
        assert_eq!(item.title, "Galaxy");
    }

    #[test]
    fn test_serialize_omits_absent_optionals() {
        let item = Item::video("https://youtube.com/embed/x", "Launch", "2024-02-02");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""media_type":"video""#));
        assert!(!json.contains("hdurl"));
        assert!(!json.contains("copyright"));
    }

    #[test]
    fn test_display_url_prefers_hd_for_images() {
        let image = Item::image("a.jpg", "A", "2024-01-01").with_hd_url("a_hd.jpg");
        assert_eq!(image.display_url(), "a_hd.jpg");

        let plain = Item::image("b.jpg", "B", "2024-01-01");
        assert_eq!(plain.display_url(), "b.jpg");

        let mut video = Item::video("v", "V", "2024-01-01");
        video.hdurl = Some("ignored".to_string());
        assert_eq!(video.display_url(), "v");
    }

    #[test]
    fn test_credit() {
        let item = Item::image("a", "A", "2024-01-01").with_copyright("\nJane Doe\n");
        assert_eq!(item.credit(), "2024-01-01 Jane Doe");
        assert_eq!(Item::image("b", "B", "2024-01-02").credit(), "2024-01-02");
    }

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Image.to_string(), "image");
        assert_eq!(MediaType::Video.to_string(), "video");
    }
}
