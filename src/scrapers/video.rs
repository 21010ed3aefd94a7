//! Per-video date lookup from the watch page.
//!
//! Channel listings only carry a relative "3 weeks ago" label. The absolute
//! publish date lives in the watch page's `videoPrimaryInfoRenderer`.

use super::page::{self, search_key, text_of};
use super::{DateLookup, YOUTUBE_BASE_URL, YouTubeClient};
use crate::error::ScrapeError;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument};

/// URL of the watch page for `video_id`.
pub fn watch_url(video_id: &str) -> String {
    format!("{YOUTUBE_BASE_URL}/watch?v={video_id}")
}

/// The first `videoPrimaryInfoRenderer` of a watch page's initial data.
pub fn primary_info<'a>(data: &'a Value, video_id: &str) -> Result<&'a Value, ScrapeError> {
    search_key(data, "videoPrimaryInfoRenderer")
        .next()
        .ok_or_else(|| ScrapeError::VideoNotFound {
            video_id: video_id.to_string(),
        })
}

/// Date text of a watch page's initial data, e.g. `"Oct 25, 2009"`.
pub fn date_text_of(data: &Value, video_id: &str) -> Result<String, ScrapeError> {
    primary_info(data, video_id)?
        .get("dateText")
        .and_then(text_of)
        .ok_or(ScrapeError::MissingField { field: "dateText" })
}

impl DateLookup for YouTubeClient {
    #[instrument(level = "debug", skip(self))]
    async fn date_text(&self, video_id: &str) -> Result<String, ScrapeError> {
        let t0 = Instant::now();
        let url = watch_url(video_id);
        let html = self.fetch_page(&url).await?;
        // Only checked for presence; the watch page needs no innertube calls.
        page::innertube_client(&html, &url)?;
        let data = page::initial_data(&html, &url)?;
        let date = date_text_of(&data, video_id)?;
        debug!(
            %date,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Resolved date text"
        );
        Ok(date)
    }
}
