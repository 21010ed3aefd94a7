//! The enrichment pipeline: list, look up dates, merge, serialize.
//!
//! ```text
//! channel ─▶ ChannelLister ─▶ Vec<VideoRecord>
//!                                  │ video IDs
//!                                  ▼
//!                    LookupPool ×N DateLookup ─▶ DateIndex
//!                                  │
//!            merge by videoId ◀────┘ ─▶ JSON array
//! ```
//!
//! Any failure at any stage aborts the whole invocation; there is no
//! partial output.

use crate::error::{Error, Result};
use crate::models::{DateIndex, VideoRecord};
use crate::outputs::json::render_videos;
use crate::pool::LookupPool;
use crate::scrapers::{ChannelLister, ChannelSource, DateLookup};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Number of videos listed when the caller does not say.
pub const DEFAULT_MAX_VIDEOS: usize = 10;

/// List `channel` and enrich each video with its date text.
///
/// The listing is fully materialized before any lookup starts. The returned
/// records keep the lister's order.
#[instrument(level = "info", skip(lister, lookup, pool), fields(workers = pool.workers()))]
pub async fn enrich_channel<L, D>(
    lister: &L,
    lookup: Arc<D>,
    pool: &LookupPool,
    channel: &str,
    max_videos: usize,
) -> Result<Vec<VideoRecord>>
where
    L: ChannelLister,
    D: DateLookup,
{
    let t0 = Instant::now();
    let source = ChannelSource::resolve(channel);
    let mut videos = lister
        .list_videos(&source, max_videos)
        .await
        .map_err(Error::Listing)?;
    info!(count = videos.len(), "Channel listing complete");

    let ids = videos.iter().map(|v| v.video_id.clone()).collect::<Vec<_>>();
    let dates = pool.run(lookup, ids).await?;
    merge_dates(&mut videos, &dates)?;

    info!(
        count = videos.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Enriched channel videos"
    );
    Ok(videos)
}

/// [`enrich_channel`], rendered as a JSON array string.
pub async fn fetch<L, D>(
    lister: &L,
    lookup: Arc<D>,
    pool: &LookupPool,
    channel: &str,
    max_videos: usize,
    pretty: bool,
) -> Result<String>
where
    L: ChannelLister,
    D: DateLookup,
{
    let videos = enrich_channel(lister, lookup, pool, channel, max_videos).await?;
    render_videos(&videos, pretty)
}

/// Set each record's `dateText` from `dates`, in place.
///
/// Every record's ID must be present; a missing one fails the merge.
pub fn merge_dates(videos: &mut [VideoRecord], dates: &DateIndex) -> Result<()> {
    for video in videos.iter_mut() {
        let date = dates
            .get(&video.video_id)
            .ok_or_else(|| Error::MissingDate {
                video_id: video.video_id.clone(),
            })?;
        video.date_text = Some(date.clone());
    }
    Ok(())
}
