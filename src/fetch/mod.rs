/*!
 * Fetch collaborators delivering raw subtitle payloads.
 *
 * The core pipeline never performs I/O itself: it hands a track's delivery
 * descriptor to a `SubtitleFetcher` and treats any failure as the track
 * becoming unavailable. Two implementations are provided:
 * - `HttpFetcher`: external tracks served over HTTP(S)
 * - `FileFetcher`: sidecar files on the local filesystem
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::FetchError;
use crate::track_source::DeliveryDescriptor;

pub mod file;
pub mod http;

pub use file::FileFetcher;
pub use http::HttpFetcher;

/// Common trait for all subtitle payload fetchers
///
/// Implementations are handed the delivery descriptor opaque to the rest of
/// the pipeline and return the raw bytes of the subtitle document.
#[async_trait]
pub trait SubtitleFetcher: Send + Sync + Debug {
    /// Fetch the raw payload for a delivery descriptor
    ///
    /// # Arguments
    /// * `delivery` - Where and how the track's bytes are obtainable
    ///
    /// # Returns
    /// * `Result<Bytes, FetchError>` - The raw payload or the failure reason
    async fn fetch(&self, delivery: &DeliveryDescriptor) -> Result<Bytes, FetchError>;
}

/// Fetcher dispatching on the delivery descriptor variant.
///
/// This is the default wiring: remote tracks go through HTTP, sidecar
/// tracks through the filesystem. Natively delivered tracks have no bytes
/// to fetch - asking for them is a caller bug surfaced as an error.
#[derive(Debug)]
pub struct StandardFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl StandardFetcher {
    /// Create a standard fetcher with the given HTTP timeout
    pub fn new(fetch_timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(StandardFetcher {
            http: HttpFetcher::new(fetch_timeout_secs)?,
            file: FileFetcher::new(),
        })
    }
}

#[async_trait]
impl SubtitleFetcher for StandardFetcher {
    async fn fetch(&self, delivery: &DeliveryDescriptor) -> Result<Bytes, FetchError> {
        match delivery {
            DeliveryDescriptor::Remote { .. } => self.http.fetch(delivery).await,
            DeliveryDescriptor::Sidecar { .. } => self.file.fetch(delivery).await,
            DeliveryDescriptor::Native => Err(FetchError::UnsupportedDelivery(
                "natively delivered tracks have no payload to fetch".to_string(),
            )),
        }
    }
}
