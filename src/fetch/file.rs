/*!
 * Filesystem fetcher for sidecar subtitle tracks.
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;

use crate::errors::FetchError;
use crate::track_source::DeliveryDescriptor;
use super::SubtitleFetcher;

/// Reads sidecar subtitle files from the local filesystem
#[derive(Debug, Default)]
pub struct FileFetcher;

impl FileFetcher {
    /// Create a file fetcher
    pub fn new() -> Self {
        FileFetcher
    }
}

#[async_trait]
impl SubtitleFetcher for FileFetcher {
    async fn fetch(&self, delivery: &DeliveryDescriptor) -> Result<Bytes, FetchError> {
        let DeliveryDescriptor::Sidecar { path } = delivery else {
            return Err(FetchError::UnsupportedDelivery(format!(
                "FileFetcher cannot serve {:?}",
                delivery
            )));
        };

        debug!("Reading sidecar subtitle file {}", path.display());
        let raw = tokio::fs::read(path).await?;
        Ok(Bytes::from(raw))
    }
}
