/*!
 * # dualsub - Dual-channel subtitle track pipeline
 *
 * A Rust library for rendering two independently configured subtitle tracks
 * in parallel during media playback.
 *
 * ## Features
 *
 * - Parse SubRip and WebVTT payloads into styled, time-indexed cue events
 * - Query the active cue set for any playback position in O(log n + k)
 * - Bind two independently selected tracks to two independent render sinks
 * - Survive backend switches and track reselection without flicker or
 *   stale content
 * - Load tracks off the playback path on a bounded background pool
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `cue`: The timed, styled cue model
 * - `parsers`: Format parsers and dispatch:
 *   - `parsers::subrip`: SubRip (.srt) parser
 *   - `parsers::webvtt`: WebVTT (.vtt) parser
 * - `track_index`: Immutable time-indexed cue lookup
 * - `track_source`: One stream's identity plus its lazily built index
 * - `router`: The dual channel routing state machine
 * - `render`: Render sink interface and delivery marshalling
 * - `loader`: Bounded background track loading
 * - `session`: Per-media-item lifecycle and the selection command surface
 * - `fetch`: Fetch collaborators for remote and sidecar payloads
 * - `discovery`: Sidecar track discovery
 * - `app_config`: Configuration management
 * - `app_controller`: CLI orchestration
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the pipeline
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cue;
pub mod discovery;
pub mod errors;
pub mod fetch;
pub mod language_utils;
pub mod loader;
pub mod parsers;
pub mod render;
pub mod router;
pub mod session;
pub mod track_index;
pub mod track_source;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cue::{Cue, CueContent, CueRegion, CueSet, StyledSpan};
pub use errors::{FetchError, SessionError, SubtitleError};
pub use fetch::{FileFetcher, HttpFetcher, StandardFetcher, SubtitleFetcher};
pub use loader::TrackLoader;
pub use parsers::{SubtitleFormat, parse};
pub use render::{RenderHandle, RenderSink, spawn_render_loop};
pub use router::{ChannelId, ChannelState, DualChannelRouter};
pub use session::PlaybackSession;
pub use track_index::TrackIndex;
pub use track_source::{DeliveryDescriptor, SourceState, TrackDescriptor, TrackSource};
