//! Channel tab listing.
//!
//! The first page of a tab is server-rendered HTML with the initial grid in
//! `ytInitialData`. Every further page comes from the innertube `browse`
//! endpoint, addressed by the continuation token found in the previous page.
//!
//! Non-default orderings are reached through the tab's filter chips: the
//! first page is only used to find the chip's continuation, and listing
//! starts from the page that continuation returns.

use super::page::{self, search_key};
use super::{
    BROWSE_ENDPOINT, ChannelLister, ChannelSource, ListingOptions, YouTubeClient, send,
    with_client_headers,
};
use crate::error::ScrapeError;
use crate::models::{SortBy, VideoRecord};
use serde_json::{Value, json};
use std::future::Future;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Where the next page of a listing lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub token: String,
    pub click_tracking_params: String,
}

impl Continuation {
    /// Read a `{continuationCommand: {token}, clickTrackingParams}` endpoint.
    fn from_endpoint(endpoint: &Value) -> Result<Self, ScrapeError> {
        let token = endpoint
            .get("continuationCommand")
            .and_then(|command| command.get("token"))
            .and_then(Value::as_str)
            .ok_or(ScrapeError::MissingField {
                field: "continuationCommand.token",
            })?;
        let click_tracking_params = endpoint
            .get("clickTrackingParams")
            .and_then(Value::as_str)
            .ok_or(ScrapeError::MissingField {
                field: "clickTrackingParams",
            })?;
        Ok(Self {
            token: token.to_string(),
            click_tracking_params: click_tracking_params.to_string(),
        })
    }
}

/// Continuation of a page in the default order, `None` on the last page.
pub fn next_continuation(data: &Value) -> Result<Option<Continuation>, ScrapeError> {
    search_key(data, "continuationEndpoint")
        .next()
        .map(Continuation::from_endpoint)
        .transpose()
}

/// Continuation that switches the listing to `sort_by`, from the filter
/// chip bar of a tab's first page.
pub fn sort_continuation(data: &Value, sort_by: SortBy) -> Result<Continuation, ScrapeError> {
    let chips = search_key(data, "feedFilterChipBarRenderer")
        .next()
        .ok_or(ScrapeError::MissingField {
            field: "feedFilterChipBarRenderer",
        })?;
    let endpoint = chips
        .get("contents")
        .and_then(|contents| contents.get(sort_by.chip_index()))
        .and_then(|chip| chip.get("chipCloudChipRenderer"))
        .and_then(|chip| chip.get("navigationEndpoint"))
        .ok_or(ScrapeError::MissingField {
            field: "chipCloudChipRenderer",
        })?;
    Continuation::from_endpoint(endpoint)
}

/// Every item rendered under `renderer_key`, in page order.
pub fn page_videos(data: &Value, renderer_key: &str) -> Result<Vec<VideoRecord>, ScrapeError> {
    search_key(data, renderer_key)
        .map(|item| {
            if item.get("videoId").and_then(Value::as_str).is_none() {
                return Err(ScrapeError::MissingField { field: "videoId" });
            }
            Ok(serde_json::from_value(item.clone())?)
        })
        .collect()
}

/// Fetches the page a continuation points at.
trait BrowsePages {
    fn browse(
        &self,
        continuation: &Continuation,
    ) -> impl Future<Output = Result<Value, ScrapeError>> + Send;
}

/// Innertube client state carried across continuation requests.
struct BrowseSession<'a> {
    youtube: &'a YouTubeClient,
    client: Value,
    client_version: String,
    api_key: String,
}

impl BrowsePages for BrowseSession<'_> {
    #[instrument(level = "debug", skip_all)]
    async fn browse(&self, continuation: &Continuation) -> Result<Value, ScrapeError> {
        let body = json!({
            "context": {
                "clickTracking": { "clickTrackingParams": continuation.click_tracking_params },
                "client": self.client,
            },
            "continuation": continuation.token,
        });
        let request = with_client_headers(
            self.youtube
                .http
                .post(BROWSE_ENDPOINT)
                .query(&[("key", self.api_key.as_str())])
                .json(&body),
            &self.client_version,
        );
        Ok(send(request, BROWSE_ENDPOINT).await?.json().await?)
    }
}

impl ChannelLister for YouTubeClient {
    #[instrument(level = "info", skip(self, channel), fields(channel = %channel.base_url()))]
    async fn list_videos(
        &self,
        channel: &ChannelSource,
        limit: usize,
    ) -> Result<Vec<VideoRecord>, ScrapeError> {
        let t0 = Instant::now();
        let options = self.options();
        let url = channel.tab_url(options.content_type);

        let html = self.fetch_page(&url).await?;
        let client = page::innertube_client(&html, &url)?;
        let session = BrowseSession {
            youtube: self,
            client_version: page::client_version(&client)?.to_string(),
            api_key: page::api_key(&html, &url)?,
            client,
        };
        let first = page::initial_data(&html, &url)?;
        drop(html);

        let (videos, pages) = paginate(&session, &first, options, limit).await?;
        info!(
            count = videos.len(),
            pages,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Listed channel videos"
        );
        Ok(videos)
    }
}

/// Walk a listing from its first page, returning the videos and the number
/// of pages fetched.
///
/// In the default order the first page's items come first. Any other order
/// discards them and starts from the chip's continuation, which goes out
/// without delay; every later page waits `options.page_delay`.
async fn paginate<P>(
    source: &P,
    first: &Value,
    options: &ListingOptions,
    limit: usize,
) -> Result<(Vec<VideoRecord>, usize), ScrapeError>
where
    P: BrowsePages + Sync,
{
    let renderer_key = options.content_type.renderer_key();
    let mut videos = Vec::new();
    let mut paced = options.sort_by == SortBy::Newest;
    let mut next = if paced {
        collect_page(&mut videos, first, renderer_key, limit)?;
        next_continuation(first)?
    } else {
        debug!(sort_by = ?options.sort_by, "Switching listing order");
        Some(sort_continuation(first, options.sort_by)?)
    };
    let mut pages = 1usize;

    while let Some(continuation) = next {
        if limit_reached(videos.len(), limit) {
            break;
        }
        if paced {
            sleep(options.page_delay).await;
        }
        paced = true;
        let data = source.browse(&continuation).await?;
        pages += 1;
        collect_page(&mut videos, &data, renderer_key, limit)?;
        debug!(page = pages, count = videos.len(), "Fetched continuation page");
        next = next_continuation(&data)?;
    }
    Ok((videos, pages))
}

fn limit_reached(count: usize, limit: usize) -> bool {
    limit != 0 && count >= limit
}

/// Append a page's items to `videos`, stopping at `limit`.
fn collect_page(
    videos: &mut Vec<VideoRecord>,
    data: &Value,
    renderer_key: &str,
    limit: usize,
) -> Result<(), ScrapeError> {
    for video in page_videos(data, renderer_key)? {
        if limit_reached(videos.len(), limit) {
            break;
        }
        videos.push(video);
    }
    Ok(())
}
