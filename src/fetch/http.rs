/*!
 * HTTP fetcher for externally delivered subtitle tracks.
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use std::time::Duration;
use url::Url;

use crate::errors::FetchError;
use crate::track_source::DeliveryDescriptor;
use super::SubtitleFetcher;

/// Fetches subtitle payloads over HTTP(S)
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Create a fetcher with a per-request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            timeout_secs,
        })
    }

    /// Create a fetcher around an existing client - used by tests
    #[allow(dead_code)]
    pub fn with_client(client: reqwest::Client, timeout_secs: u64) -> Self {
        HttpFetcher {
            client,
            timeout_secs,
        }
    }
}

#[async_trait]
impl SubtitleFetcher for HttpFetcher {
    async fn fetch(&self, delivery: &DeliveryDescriptor) -> Result<Bytes, FetchError> {
        let DeliveryDescriptor::Remote { url } = delivery else {
            return Err(FetchError::UnsupportedDelivery(format!(
                "HttpFetcher cannot serve {:?}",
                delivery
            )));
        };

        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        debug!("Fetching subtitle payload from {}", parsed);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.clone(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))
    }
}
