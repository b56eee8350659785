/*!
 * Playback session lifecycle.
 *
 * This module handles:
 * - Creating a session when a media item's tracks become known
 * - Resolving track ids from the selection command surface
 * - Forwarding position ticks and native cue events to the router
 * - Tearing everything down when the media item changes or playback stops
 */

use std::sync::Arc;
use log::{debug, info};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::cue::CueSet;
use crate::errors::SessionError;
use crate::loader::TrackLoader;
use crate::render::{RenderSink, spawn_render_loop};
use crate::router::{ChannelId, DualChannelRouter};
use crate::track_source::{TrackDescriptor, TrackSource};

/// One media item's subtitle session: all discovered track sources plus the
/// dual channel router bound to that item's render surfaces
pub struct PlaybackSession {
    id: Uuid,
    media_id: String,
    sources: Vec<Arc<TrackSource>>,
    router: DualChannelRouter,
    render_tasks: Vec<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Create a session for a media item.
    ///
    /// Track sources are constructed eagerly from the discovered
    /// descriptors; indexes are built lazily when a channel selects them.
    pub fn new(
        media_id: impl Into<String>,
        descriptors: Vec<TrackDescriptor>,
        loader: TrackLoader,
        primary_sink: Box<dyn RenderSink>,
        secondary_sink: Box<dyn RenderSink>,
    ) -> Self {
        let media_id = media_id.into();
        let id = Uuid::new_v4();

        let sources: Vec<Arc<TrackSource>> = descriptors
            .into_iter()
            .map(|descriptor| Arc::new(TrackSource::new(descriptor)))
            .collect();

        let (primary, primary_task) = spawn_render_loop(primary_sink);
        let (secondary, secondary_task) = spawn_render_loop(secondary_sink);
        let router = DualChannelRouter::new(loader, primary, secondary);

        info!(
            "Session {}: {} with {} subtitle track(s)",
            &id.to_string()[..8],
            media_id,
            sources.len()
        );

        PlaybackSession {
            id,
            media_id,
            sources,
            router,
            render_tasks: vec![primary_task, secondary_task],
        }
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The media item this session belongs to
    pub fn media_id(&self) -> &str {
        &self.media_id
    }

    /// Descriptors of all discovered tracks
    pub fn tracks(&self) -> Vec<&TrackDescriptor> {
        self.sources.iter().map(|s| s.descriptor()).collect()
    }

    /// Look up a track source by id
    pub fn source(&self, track_id: &str) -> Option<Arc<TrackSource>> {
        self.sources
            .iter()
            .find(|s| s.id() == track_id)
            .cloned()
    }

    /// The selection command surface: bind a track (or nothing) to a channel
    pub fn select_track(
        &self,
        channel: ChannelId,
        track_id: Option<&str>,
    ) -> Result<(), SessionError> {
        match track_id {
            None => {
                self.router.select(channel, None);
                Ok(())
            }
            Some(track_id) => {
                let source = self
                    .source(track_id)
                    .ok_or_else(|| SessionError::UnknownTrack(track_id.to_string()))?;
                self.router.select(channel, Some(source));
                Ok(())
            }
        }
    }

    /// Forward a playback position tick
    pub fn position(&self, position_us: u64) {
        self.router.on_position(position_us);
    }

    /// Forward a natively decoded cue event
    pub fn native_cues(&self, cues: CueSet, source_track_id: &str) {
        self.router.on_native_cues(cues, source_track_id);
    }

    /// The underlying router, for callers wiring backend switches
    pub fn router(&self) -> &DualChannelRouter {
        &self.router
    }

    /// Rebind both channels to new render surfaces (backend switch).
    ///
    /// Spawns fresh render loops for the new sinks; the router closes the
    /// old surfaces and re-delivers each channel's last cue set.
    pub fn rebind_sinks(
        &mut self,
        primary_sink: Box<dyn RenderSink>,
        secondary_sink: Box<dyn RenderSink>,
    ) {
        let (primary, primary_task) = spawn_render_loop(primary_sink);
        let (secondary, secondary_task) = spawn_render_loop(secondary_sink);
        self.router.rebind_sinks(primary, secondary);
        self.render_tasks.push(primary_task);
        self.render_tasks.push(secondary_task);
    }

    /// Tear the session down: clear both channels, close the surfaces and
    /// wait for the render loops to drain
    pub async fn close(self) {
        debug!("Session {}: closing", &self.id.to_string()[..8]);

        self.router.select(ChannelId::Primary, None);
        self.router.select(ChannelId::Secondary, None);
        self.router.close_sinks();

        for task in self.render_tasks {
            let _ = task.await;
        }
    }
}
