//! YouTube scraping backend.
//!
//! The pipeline only sees two seams:
//!
//! - [`ChannelLister`]: list a channel's videos, in channel order
//! - [`DateLookup`]: resolve one video's publish-date text
//!
//! [`YouTubeClient`] implements both against the public website. It never
//! uses the Data API: pages are fetched as a browser would, and the JSON they
//! embed is read by [`page`].
//!
//! # Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`page`] | Locate `ytInitialData` and the innertube config in HTML |
//! | [`channel`] | Channel tab listing with `browse` continuations |
//! | [`video`] | Watch page lookup of `dateText` |

use crate::error::ScrapeError;
use crate::models::{ContentType, SortBy, VideoRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

pub mod channel;
pub mod page;
pub mod video;

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const BROWSE_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/browse";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/99.0.4844.51 Safari/537.36";
const CONSENT_COOKIE: &str = "CONSENT=YES+cb";

static CHANNEL_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UC[\w-]{22}$").expect("channel ID regex is valid"));

/// Lists the videos of a channel.
pub trait ChannelLister {
    /// Fully materialized listing of `channel`, at most `limit` entries
    /// (`0` means no limit), in the order the channel presents them.
    fn list_videos(
        &self,
        channel: &ChannelSource,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<VideoRecord>, ScrapeError>> + Send;
}

/// Resolves the publish-date text of a single video.
///
/// Implementors are shared across lookup workers.
pub trait DateLookup: Send + Sync + 'static {
    fn date_text(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// Base URL of a channel, resolved from whatever the user passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSource {
    base_url: String,
}

impl ChannelSource {
    /// Resolve a channel identifier.
    ///
    /// - `UC…` channel IDs map to `/channel/<id>`
    /// - `@handle`s map to `/@handle`
    /// - anything else is taken as a URL as-is
    pub fn resolve(identifier: &str) -> Self {
        let identifier = identifier.trim();
        let base_url = if CHANNEL_ID_REGEX.is_match(identifier) {
            format!("{YOUTUBE_BASE_URL}/channel/{identifier}")
        } else if identifier.starts_with('@') {
            format!("{YOUTUBE_BASE_URL}/{identifier}")
        } else {
            identifier.trim_end_matches('/').to_string()
        };
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the channel tab listing `content_type`, in grid view.
    pub fn tab_url(&self, content_type: ContentType) -> String {
        format!("{}/{}?view=0&flow=grid", self.base_url, content_type.path())
    }
}

/// Options that shape a channel listing.
#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub content_type: ContentType,
    pub sort_by: SortBy,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            content_type: ContentType::default(),
            sort_by: SortBy::default(),
            page_delay: Duration::from_secs(1),
        }
    }
}

/// Scraper for the public YouTube website.
///
/// Cloning is cheap; the underlying HTTP client is reference counted.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: Client,
    options: ListingOptions,
}

impl YouTubeClient {
    /// Build a client that presents itself as a desktop browser with the
    /// EU consent interstitial already accepted.
    pub fn new(options: ListingOptions) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        headers.insert(COOKIE, HeaderValue::from_static(CONSENT_COOKIE));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    /// GET an HTML page, skipping the consent banner.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let request = self.http.get(url).query(&[("ucbcb", "1")]);
        let body = send(request, url).await?.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Send a request and turn non-success statuses into [`ScrapeError::Status`].
async fn send(request: RequestBuilder, url: &str) -> Result<reqwest::Response, ScrapeError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}

/// Session headers YouTube expects on innertube calls.
fn with_client_headers(request: RequestBuilder, client_version: &str) -> RequestBuilder {
    request
        .header("X-YouTube-Client-Name", "1")
        .header("X-YouTube-Client-Version", client_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_channel_id() {
        let source = ChannelSource::resolve("UCuAXFkgsw1L7xaCfnd5JJOw");
        assert_eq!(
            source.base_url(),
            "https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw"
        );
    }

    #[test]
    fn test_resolve_handle() {
        let source = ChannelSource::resolve("@LinusTechTips");
        assert_eq!(source.base_url(), "https://www.youtube.com/@LinusTechTips");
    }

    #[test]
    fn test_resolve_url_passes_through() {
        let source = ChannelSource::resolve("https://www.youtube.com/c/SomeChannel/");
        assert_eq!(source.base_url(), "https://www.youtube.com/c/SomeChannel");
        assert_eq!(
            source.tab_url(ContentType::Shorts),
            "https://www.youtube.com/c/SomeChannel/shorts?view=0&flow=grid"
        );
    }

    #[test]
    fn test_resolve_short_uc_string_is_not_an_id() {
        let source = ChannelSource::resolve("UCshort");
        assert_eq!(source.base_url(), "UCshort");
    }

    #[test]
    fn test_default_listing_options() {
        let options = ListingOptions::default();
        assert_eq!(options.content_type, ContentType::Videos);
        assert_eq!(options.sort_by, SortBy::Newest);
        assert_eq!(options.page_delay, Duration::from_secs(1));
    }
}
