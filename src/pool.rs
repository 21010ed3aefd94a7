//! Bounded, scoped worker pool for per-video date lookups.
//!
//! Every [`LookupPool::run`] owns the tasks it spawns. At most `workers`
//! lookups are in flight at once, each on its own tokio task so they spread
//! across the runtime's threads. `run` does not return until every task it
//! started has either been joined or aborted and awaited: on success all
//! lookups have completed, and on the first failure the rest are shut down
//! before the error is handed back.

use crate::error::{Error, Result};
use crate::models::DateIndex;
use crate::scrapers::DateLookup;
use itertools::Itertools;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy)]
pub struct LookupPool {
    workers: NonZeroUsize,
}

impl LookupPool {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// Pool sized to the host's available parallelism.
    pub fn with_default_size() -> Self {
        Self::new(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Look up the date of every distinct ID in `video_ids`.
    ///
    /// All-or-nothing: the first failed lookup aborts the remaining ones and
    /// is returned as [`Error::Lookup`]. A panicked lookup is reported as
    /// [`Error::Worker`].
    #[instrument(level = "info", skip_all, fields(workers = self.workers.get()))]
    pub async fn run<D, I>(&self, lookup: Arc<D>, video_ids: I) -> Result<DateIndex>
    where
        D: DateLookup,
        I: IntoIterator<Item = String>,
    {
        let t0 = Instant::now();
        let mut pending = video_ids.into_iter().unique();
        let mut tasks = JoinSet::new();
        let mut index = DateIndex::new();

        for video_id in pending.by_ref().take(self.workers.get()) {
            spawn_lookup(&mut tasks, &lookup, video_id);
        }

        while let Some(joined) = tasks.join_next().await {
            let (video_id, date) = match joined {
                Ok((video_id, Ok(date))) => (video_id, date),
                Ok((video_id, Err(source))) => {
                    error!(%video_id, error = %source, "Date lookup failed; aborting batch");
                    tasks.shutdown().await;
                    return Err(Error::Lookup { video_id, source });
                }
                Err(e) => {
                    error!(error = %e, "Lookup worker failed; aborting batch");
                    tasks.shutdown().await;
                    return Err(Error::Worker(e));
                }
            };
            debug!(%video_id, %date, "Lookup completed");
            index.insert(video_id, date);

            if let Some(video_id) = pending.next() {
                spawn_lookup(&mut tasks, &lookup, video_id);
            }
        }

        info!(
            count = index.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Resolved video dates"
        );
        Ok(index)
    }
}

type LookupOutcome = (String, std::result::Result<String, crate::error::ScrapeError>);

fn spawn_lookup<D: DateLookup>(tasks: &mut JoinSet<LookupOutcome>, lookup: &Arc<D>, video_id: String) {
    let lookup = Arc::clone(lookup);
    tasks.spawn(async move {
        let date = lookup.date_text(&video_id).await;
        (video_id, date)
    });
}
