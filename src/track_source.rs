/*!
 * Track sources: one subtitle stream's identity plus its lazily built index.
 *
 * A `TrackSource` is created eagerly when stream metadata becomes known and
 * indexed asynchronously the first time a channel selects it. The load is
 * single-flight: concurrent callers share one fetch+parse+build, and both
 * success and failure are memoized so a source never refetches behind the
 * router's back. A failed source degrades to `Unavailable` and behaves as an
 * always-empty cue provider - it never propagates errors into playback.
 */

use std::path::PathBuf;
use std::sync::Arc;
use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::SubtitleError;
use crate::fetch::SubtitleFetcher;
use crate::parsers::{self, SubtitleFormat};
use crate::track_index::TrackIndex;

/// How a track's raw bytes are obtainable.
///
/// Opaque to the core pipeline: only fetchers interpret it. `Native` marks
/// tracks the host media backend decodes itself; their cues arrive through
/// the router's native-cue path and there is nothing to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum DeliveryDescriptor {
    /// Served by a remote endpoint
    Remote {
        /// Absolute URL of the subtitle document
        url: String,
    },
    /// A file next to the media item
    Sidecar {
        /// Path of the subtitle file
        path: PathBuf,
    },
    /// Decoded by the media backend itself
    Native,
}

/// Identity of one subtitle stream within a media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Stable id, unique within the media item
    pub id: String,

    /// Human-readable name for track menus
    pub display_name: String,

    /// ISO language code, when known
    #[serde(default)]
    pub language: Option<String>,

    /// Forced-display track flag
    #[serde(default)]
    pub is_forced: bool,

    /// Declared codec tag (e.g. `srt`, `webvtt`)
    pub codec: String,

    /// How to obtain the raw bytes
    pub delivery: DeliveryDescriptor,
}

/// Load state of a track source
#[derive(Debug, Clone)]
pub enum SourceState {
    /// Nothing requested yet
    Idle,
    /// A fetch+parse+build is in flight
    Loading,
    /// The track is usable. Natively delivered tracks carry no index.
    Ready {
        /// Query index, absent for native delivery
        index: Option<Arc<TrackIndex>>,
    },
    /// The track failed to load and stays empty
    Unavailable {
        /// Human-readable failure reason
        reason: String,
    },
}

impl SourceState {
    /// Whether the load reached a terminal outcome (success or failure)
    pub fn is_settled(&self) -> bool {
        matches!(self, SourceState::Ready { .. } | SourceState::Unavailable { .. })
    }
}

/// One subtitle stream: identity plus memoized index
#[derive(Debug)]
pub struct TrackSource {
    descriptor: TrackDescriptor,
    state: RwLock<SourceState>,
    payload_hash: RwLock<Option<[u8; 32]>>,
    // Single-flight guard: at most one fetch+parse runs per source
    load_gate: tokio::sync::Mutex<()>,
}

impl TrackSource {
    /// Construct the identity eagerly; the index is built on first use
    pub fn new(descriptor: TrackDescriptor) -> Self {
        TrackSource {
            descriptor,
            state: RwLock::new(SourceState::Idle),
            payload_hash: RwLock::new(None),
            load_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// The track's descriptor
    pub fn descriptor(&self) -> &TrackDescriptor {
        &self.descriptor
    }

    /// The track's stable id
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Current load state
    pub fn state(&self) -> SourceState {
        self.state.read().clone()
    }

    /// The built index, when the source is ready and indexable
    pub fn index(&self) -> Option<Arc<TrackIndex>> {
        match &*self.state.read() {
            SourceState::Ready { index } => index.clone(),
            _ => None,
        }
    }

    /// Fetch, parse and index the track exactly once.
    ///
    /// Callers arriving while a load is in flight await the same load
    /// instead of starting another. Completed outcomes - including
    /// `Unavailable` - are returned without refetching.
    pub async fn ensure_indexed(&self, fetcher: &dyn SubtitleFetcher) -> SourceState {
        {
            let state = self.state.read();
            if state.is_settled() {
                return state.clone();
            }
        }

        let _gate = self.load_gate.lock().await;

        // A concurrent caller may have finished the load while this one
        // waited on the gate
        {
            let state = self.state.read();
            if state.is_settled() {
                return state.clone();
            }
        }

        *self.state.write() = SourceState::Loading;
        let outcome = self.load(fetcher).await;
        *self.state.write() = outcome.clone();
        outcome
    }

    /// Refetch the payload and rebuild the index only when the bytes
    /// actually changed, keyed by the payload's SHA-256.
    pub async fn reload(&self, fetcher: &dyn SubtitleFetcher) -> SourceState {
        let _gate = self.load_gate.lock().await;

        if self.descriptor.delivery == DeliveryDescriptor::Native {
            let outcome = SourceState::Ready { index: None };
            *self.state.write() = outcome.clone();
            return outcome;
        }

        let raw = match fetcher.fetch(&self.descriptor.delivery).await {
            Ok(raw) => raw,
            Err(e) => {
                let outcome = self.degrade(SubtitleError::Fetch(e));
                *self.state.write() = outcome.clone();
                return outcome;
            }
        };

        let hash = payload_hash(&raw);
        let unchanged = *self.payload_hash.read() == Some(hash)
            && matches!(&*self.state.read(), SourceState::Ready { .. });
        if unchanged {
            debug!("Track {}: payload unchanged, keeping existing index", self.id());
            return self.state.read().clone();
        }

        let outcome = self.build_from_payload(&raw, hash);
        *self.state.write() = outcome.clone();
        outcome
    }

    async fn load(&self, fetcher: &dyn SubtitleFetcher) -> SourceState {
        // Natively delivered tracks are ready as soon as they are selected;
        // their cues arrive through the native-cue path
        if self.descriptor.delivery == DeliveryDescriptor::Native {
            return SourceState::Ready { index: None };
        }

        let raw = match fetcher.fetch(&self.descriptor.delivery).await {
            Ok(raw) => raw,
            Err(e) => return self.degrade(SubtitleError::Fetch(e)),
        };

        let hash = payload_hash(&raw);
        self.build_from_payload(&raw, hash)
    }

    fn build_from_payload(&self, raw: &[u8], hash: [u8; 32]) -> SourceState {
        let format = match SubtitleFormat::from_codec_tag(&self.descriptor.codec) {
            Ok(format) => format,
            Err(e) => return self.degrade(e),
        };

        let cues = match parsers::parse(raw, format) {
            Ok(cues) => cues,
            Err(e) => return self.degrade(e),
        };

        let index = TrackIndex::build(cues);
        debug!(
            "Track {}: indexed {} cues ({} bytes)",
            self.id(),
            index.len(),
            raw.len()
        );

        *self.payload_hash.write() = Some(hash);
        SourceState::Ready {
            index: Some(Arc::new(index)),
        }
    }

    fn degrade(&self, error: SubtitleError) -> SourceState {
        warn!("Track {} unavailable: {}", self.id(), error);
        SourceState::Unavailable {
            reason: error.to_string(),
        }
    }
}

fn payload_hash(raw: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    hasher.finalize().into()
}
