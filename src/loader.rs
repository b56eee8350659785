/*!
 * Background track loading.
 *
 * Fetch-and-parse runs off the playback-critical path on a bounded worker
 * pool: a semaphore caps how many fetch+parse+build jobs run at once so
 * loading several tracks never contends with decode/render work. Each
 * source's own single-flight guard deduplicates loads per track; the pool
 * bounds loads across tracks.
 */

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::fetch::SubtitleFetcher;
use crate::track_source::{SourceState, TrackSource};

/// Bounded background loader shared by all channels of a session
#[derive(Debug, Clone)]
pub struct TrackLoader {
    fetcher: Arc<dyn SubtitleFetcher>,
    permits: Arc<Semaphore>,
}

impl TrackLoader {
    /// Create a loader with at most `max_concurrent_loads` jobs in flight
    pub fn new(fetcher: Arc<dyn SubtitleFetcher>, max_concurrent_loads: usize) -> Self {
        TrackLoader {
            fetcher,
            permits: Arc::new(Semaphore::new(max_concurrent_loads.max(1))),
        }
    }

    /// The fetch collaborator this loader hands descriptors to
    pub fn fetcher(&self) -> Arc<dyn SubtitleFetcher> {
        self.fetcher.clone()
    }

    /// Spawn a background load for one source and return its handle.
    ///
    /// The job waits for a pool permit, then runs the source's
    /// single-flight `ensure_indexed`. The resolved state is the task's
    /// output; callers decide what to do with it (the router checks its
    /// generation guard before acting on it).
    pub fn spawn_load(&self, source: Arc<TrackSource>) -> JoinHandle<SourceState> {
        let fetcher = self.fetcher.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.unwrap();
            source.ensure_indexed(fetcher.as_ref()).await
        })
    }
}
