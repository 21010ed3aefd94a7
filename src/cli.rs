//! Command-line interface definitions.
//!
//! Positional arguments mirror the two inputs of the enrichment: the channel
//! and how many of its videos to take. Listing knobs can also come from the
//! environment.

use crate::enrich::DEFAULT_MAX_VIDEOS;
use crate::models::{ContentType, SortBy};
use crate::scrapers::ListingOptions;
use clap::Parser;
use std::time::Duration;

/// List a YouTube channel's videos with their publish dates, as JSON.
///
/// # Examples
///
/// ```sh
/// # Ten most recent uploads
/// yt_channel_dates https://www.youtube.com/@LinusTechTips
///
/// # Three oldest live streams, indented
/// yt_channel_dates @LinusTechTips 3 --content-type streams --sort-by oldest --pretty
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Channel URL, `@handle`, or `UC…` channel ID
    pub channel_url: String,

    /// Maximum number of videos to list (0 lists everything)
    #[arg(default_value_t = DEFAULT_MAX_VIDEOS)]
    pub n_videos: usize,

    /// Channel tab to list
    #[arg(long, env = "YT_CONTENT_TYPE", value_enum, default_value_t = ContentType::Videos)]
    pub content_type: ContentType,

    /// Listing order
    #[arg(long, env = "YT_SORT_BY", value_enum, default_value_t = SortBy::Newest)]
    pub sort_by: SortBy,

    /// Delay between listing page requests, in milliseconds
    #[arg(long, env = "YT_PAGE_DELAY_MS", default_value_t = 1000)]
    pub page_delay_ms: u64,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            content_type: self.content_type,
            sort_by: self.sort_by,
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }
}
