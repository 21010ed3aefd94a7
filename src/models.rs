//! Data models for channel listings and their enriched representation.
//!
//! - [`VideoRecord`]: one video from a channel listing, open to whatever
//!   fields the listing carried
//! - [`DateIndex`]: video ID → date text, built by the lookup stage
//! - [`ContentType`] / [`SortBy`]: which channel tab to list and in what order
//!
//! Field names on the wire are camelCase, matching YouTube's own renderer
//! JSON so records pass through untouched.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Mapping from video ID to its publish-date text.
pub type DateIndex = HashMap<String, String>;

/// A single video from a channel listing.
///
/// Only `videoId` is known to the pipeline. Every other field the listing
/// supplied is kept verbatim in `extra` and flattened back into the same
/// JSON object on output, in its original order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VideoRecord {
    #[serde(rename = "videoId")]
    pub video_id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Publish date text, present once the record has been enriched.
    /// Serialized last, after the listing's own fields.
    #[serde(rename = "dateText", default, skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,
}

#[cfg(test)]
impl VideoRecord {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            extra: Map::new(),
            date_text: None,
        }
    }
}

/// Which tab of a channel to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContentType {
    #[default]
    Videos,
    Shorts,
    Streams,
}

impl ContentType {
    /// Path segment of the channel tab.
    pub fn path(self) -> &'static str {
        match self {
            ContentType::Videos => "videos",
            ContentType::Shorts => "shorts",
            ContentType::Streams => "streams",
        }
    }

    /// Key under which the tab's items are rendered in page data.
    pub fn renderer_key(self) -> &'static str {
        match self {
            ContentType::Videos | ContentType::Streams => "videoRenderer",
            ContentType::Shorts => "reelItemRenderer",
        }
    }
}

/// Listing order, selected through the tab's filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortBy {
    #[default]
    Newest,
    Popular,
    Oldest,
}

impl SortBy {
    /// Index of the matching chip in `feedFilterChipBarRenderer.contents`.
    pub fn chip_index(self) -> usize {
        match self {
            SortBy::Newest => 0,
            SortBy::Popular => 1,
            SortBy::Oldest => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_passes_unknown_fields_through() {
        let raw = json!({
            "videoId": "dQw4w9WgXcQ",
            "title": { "runs": [{ "text": "Never Gonna Give You Up" }] },
            "lengthText": { "simpleText": "3:33" },
        });
        let mut record: VideoRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.date_text, None);
        assert_eq!(record.extra.len(), 2);

        record.date_text = Some("Oct 25, 2009".to_string());
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["videoId"], "dQw4w9WgXcQ");
        assert_eq!(out["dateText"], "Oct 25, 2009");
        assert_eq!(out["lengthText"]["simpleText"], "3:33");
        assert_eq!(out["title"]["runs"][0]["text"], "Never Gonna Give You Up");
    }

    #[test]
    fn test_record_without_date_omits_field() {
        let out = serde_json::to_string(&VideoRecord::new("abc")).unwrap();
        assert_eq!(out, r#"{"videoId":"abc"}"#);
    }

    #[test]
    fn test_record_requires_video_id() {
        let raw = json!({ "title": "no id here" });
        assert!(serde_json::from_value::<VideoRecord>(raw).is_err());
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(ContentType::Videos.path(), "videos");
        assert_eq!(ContentType::Streams.renderer_key(), "videoRenderer");
        assert_eq!(ContentType::Shorts.renderer_key(), "reelItemRenderer");
    }

    #[test]
    fn test_sort_chip_indices() {
        assert_eq!(SortBy::Newest.chip_index(), 0);
        assert_eq!(SortBy::Popular.chip_index(), 1);
        assert_eq!(SortBy::Oldest.chip_index(), 2);
    }
}
