/*!
 * Error types for the dualsub pipeline.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when fetching raw subtitle payloads
#[derive(Error, Debug)]
pub enum FetchError {
    /// Error reading a local sidecar file
    #[error("I/O error: {0}")]
    Io(String),

    /// Non-success HTTP status from the subtitle endpoint
    #[error("HTTP request failed: {status} for {url}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The delivery URL could not be parsed
    #[error("Invalid subtitle URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout
    #[error("Fetch timed out after {0}s")]
    Timeout(u64),

    /// Error building or executing the request
    #[error("Fetch request failed: {0}")]
    Request(String),

    /// The fetcher does not handle this kind of delivery descriptor
    #[error("Unsupported delivery descriptor: {0}")]
    UnsupportedDelivery(String),
}

impl From<std::io::Error> for FetchError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Errors that can occur while turning raw bytes into an indexed track.
///
/// Per-block parse problems are not represented here: malformed cue blocks
/// are skipped with a warning and parsing continues. Only failures that
/// make the whole payload unusable surface as a `SubtitleError`.
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The payload is not valid UTF-8 text
    #[error("Failed to decode subtitle payload as UTF-8: {0}")]
    Decode(String),

    /// The declared codec tag names a format this pipeline cannot parse
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The payload is missing the mandatory format signature
    #[error("Malformed subtitle header: {0}")]
    MalformedHeader(String),

    /// Error from the fetch collaborator
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from the playback session command surface
#[derive(Error, Debug)]
pub enum SessionError {
    /// A selection referenced a track id that was never discovered
    #[error("Unknown subtitle track id: {0}")]
    UnknownTrack(String),
}
