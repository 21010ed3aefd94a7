//! # yt_channel_dates
//!
//! Lists the videos of a YouTube channel and enriches each entry with its
//! publish-date text, printing the result as a JSON array.
//!
//! ## Usage
//!
//! ```sh
//! yt_channel_dates https://www.youtube.com/@LinusTechTips 5
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: page through the channel tab (HTML first page, innertube
//!    `browse` continuations after)
//! 2. **Lookup**: fetch each video's watch page on a bounded worker pool and
//!    read its `dateText`
//! 3. **Merge**: attach dates to the listing in its original order
//! 4. **Output**: print the JSON array to stdout
//!
//! Logs go to stderr so stdout carries nothing but the JSON.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod enrich;
mod error;
mod models;
mod outputs;
mod pool;
mod scrapers;

use cli::Cli;
use pool::LookupPool;
use scrapers::YouTubeClient;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let client = Arc::new(YouTubeClient::new(args.listing_options())?);
    let pool = LookupPool::with_default_size();
    info!(
        channel = %args.channel_url,
        n_videos = args.n_videos,
        workers = pool.workers(),
        "Fetching channel videos"
    );

    let json = match enrich::fetch(
        client.as_ref(),
        Arc::clone(&client),
        &pool,
        &args.channel_url,
        args.n_videos,
        args.pretty,
    )
    .await
    {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "Fetch failed");
            return Err(e.into());
        }
    };

    println!("{json}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
