//! Error types for the scraping backend and the enrichment pipeline.
//!
//! Two layers:
//! - [`ScrapeError`]: something went wrong talking to YouTube or reading
//!   what it sent back.
//! - [`Error`]: where in the pipeline it went wrong (listing, a single
//!   lookup, the worker pool, or serialization).
//!
//! Nothing is recovered locally; every variant is fatal to the invocation.

use thiserror::Error;

/// Failures raised by the channel lister and the per-video date lookup.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not find {what} in page {url}")]
    MissingEmbeddedData { what: &'static str, url: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("video {video_id} not found")]
    VideoNotFound { video_id: String },
}

/// Pipeline-level failures of a single `fetch` invocation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("listing channel videos failed")]
    Listing(#[source] ScrapeError),

    #[error("date lookup failed for video {video_id}")]
    Lookup {
        video_id: String,
        #[source]
        source: ScrapeError,
    },

    #[error("lookup worker failed")]
    Worker(#[from] tokio::task::JoinError),

    #[error("no date was resolved for video {video_id}")]
    MissingDate { video_id: String },

    #[error("serializing videos failed")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
