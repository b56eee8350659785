/*!
 * Dual channel routing: the subtitle state machine.
 *
 * The router binds up to two independently selected track sources to two
 * independent render surfaces and keeps both consistent as tracks, backends
 * and playback position change. Each channel moves through
 * `Empty -> Loading -> Active -> Empty` on its own; primary and secondary
 * never share state, and selecting the same track on both is an explicit
 * duplication, not an error.
 *
 * Position ticks and native cue events arrive on the playback timing path:
 * they take a short lock, query immutable indexes and hand deliveries to
 * the render handles without ever waiting on an in-flight load. Loads
 * complete in the background; a generation counter per channel discards
 * results that finish after the channel was reselected.
 */

use std::fmt;
use std::sync::Arc;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::cue::CueSet;
use crate::loader::TrackLoader;
use crate::render::RenderHandle;
use crate::track_source::{SourceState, TrackSource};

/// One of the two independent display slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    /// The main subtitle slot
    Primary,
    /// The second slot, typically rendered above the primary
    Secondary,
}

impl ChannelId {
    /// Both channels, in delivery order
    pub const ALL: [ChannelId; 2] = [ChannelId::Primary, ChannelId::Secondary];

    fn index(self) -> usize {
        match self {
            ChannelId::Primary => 0,
            ChannelId::Secondary => 1,
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Primary => write!(f, "primary"),
            ChannelId::Secondary => write!(f, "secondary"),
        }
    }
}

/// Lifecycle state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No track selected
    Empty,
    /// Track selected, index not yet ready
    Loading,
    /// Index settled (ready or unavailable); cues are delivered on tick
    Active,
}

/// Per-channel binding, mutated only by the router
struct ChannelBinding {
    state: ChannelState,
    source: Option<Arc<TrackSource>>,
    // Bumped on every selection change; stale load completions are dropped
    generation: u64,
    last_cues: CueSet,
    last_position: Option<u64>,
}

impl ChannelBinding {
    fn new() -> Self {
        ChannelBinding {
            state: ChannelState::Empty,
            source: None,
            generation: 0,
            last_cues: Vec::new(),
            last_position: None,
        }
    }
}

struct RouterInner {
    channels: Mutex<[ChannelBinding; 2]>,
    sinks: Mutex<[RenderHandle; 2]>,
    loader: TrackLoader,
}

/// Routes cue sets from two track sources to two render surfaces
#[derive(Clone)]
pub struct DualChannelRouter {
    inner: Arc<RouterInner>,
}

impl DualChannelRouter {
    /// Create a router delivering to the given per-channel handles
    pub fn new(loader: TrackLoader, primary: RenderHandle, secondary: RenderHandle) -> Self {
        DualChannelRouter {
            inner: Arc::new(RouterInner {
                channels: Mutex::new([ChannelBinding::new(), ChannelBinding::new()]),
                sinks: Mutex::new([primary, secondary]),
                loader,
            }),
        }
    }

    /// Replace a channel's bound track source.
    ///
    /// `None` empties the channel and immediately clears its display.
    /// `Some` moves the channel to `Loading` and kicks off the background
    /// load; when the load settles - and the channel was not reselected in
    /// the meantime - the channel becomes `Active` and the cue set for the
    /// last known position is delivered without waiting for the next tick.
    pub fn select(&self, channel: ChannelId, source: Option<Arc<TrackSource>>) {
        let mut channels = self.inner.channels.lock();
        let binding = &mut channels[channel.index()];
        binding.generation += 1;
        let generation = binding.generation;

        match source {
            None => {
                binding.state = ChannelState::Empty;
                binding.source = None;
                binding.last_cues = Vec::new();

                debug!("{} channel: track deselected", channel);
                // Delivered under the channels lock: per-channel delivery
                // order must match binding mutation order
                self.deliver(channel, Vec::new());
            }
            Some(source) => {
                info!(
                    "{} channel: selected track {} ({})",
                    channel,
                    source.id(),
                    source.descriptor().display_name
                );
                binding.state = ChannelState::Loading;
                binding.source = Some(source.clone());
                binding.last_cues = Vec::new();
                drop(channels);

                let router = self.clone();
                let load = self.inner.loader.spawn_load(source);
                tokio::spawn(async move {
                    let outcome = match load.await {
                        Ok(state) => state,
                        Err(e) => SourceState::Unavailable {
                            reason: format!("load task failed: {}", e),
                        },
                    };
                    router.finish_load(channel, generation, outcome);
                });
            }
        }
    }

    /// Advance the playback position.
    ///
    /// Non-blocking: channels still `Loading` (or `Empty`) deliver nothing
    /// until their index settles. An `Active` channel delivers only when
    /// the active cue set differs from the last one it delivered.
    pub fn on_position(&self, position_us: u64) {
        let mut channels = self.inner.channels.lock();
        for channel in ChannelId::ALL {
            let binding = &mut channels[channel.index()];
            binding.last_position = Some(position_us);

            if binding.state != ChannelState::Active {
                continue;
            }
            let Some(index) = binding.source.as_ref().and_then(|s| s.index()) else {
                // Natively delivered or unavailable source: nothing to query
                continue;
            };

            let cues = index.query(position_us);
            if cues != binding.last_cues {
                binding.last_cues = cues.clone();
                self.deliver(channel, cues);
            }
        }
    }

    /// Route a cue set decoded by the media backend itself.
    ///
    /// Delivered to every channel whose selected track matches
    /// `source_track_id`; when both channels select the same stream the set
    /// is duplicated to both so neither goes dark. No match drops the event.
    pub fn on_native_cues(&self, cues: CueSet, source_track_id: &str) {
        let mut matched = false;

        let mut channels = self.inner.channels.lock();
        for channel in ChannelId::ALL {
            let binding = &mut channels[channel.index()];
            let selected = binding
                .source
                .as_ref()
                .is_some_and(|s| s.id() == source_track_id);
            if !selected {
                continue;
            }

            matched = true;
            binding.last_cues = cues.clone();
            self.deliver(channel, cues.clone());
        }
        drop(channels);

        if !matched {
            debug!(
                "Dropping native cue event for unselected track {}",
                source_track_id
            );
        }
    }

    /// Rebind both channels to new render surfaces after a backend switch.
    ///
    /// Selections survive: each channel's last cue set is re-delivered to
    /// its new surface so the display does not start dark (or stale).
    pub fn rebind_sinks(&self, primary: RenderHandle, secondary: RenderHandle) {
        // The channels lock is held across the swap and the re-deliveries so
        // no concurrent tick can slip a delivery between them
        let channels = self.inner.channels.lock();

        {
            let mut sinks = self.inner.sinks.lock();
            let old = std::mem::replace(&mut *sinks, [primary, secondary]);
            for handle in old {
                handle.close();
            }
        }

        info!("Render surfaces rebound; re-delivering last cue sets");
        for channel in ChannelId::ALL {
            self.deliver(channel, channels[channel.index()].last_cues.clone());
        }
    }

    /// Current lifecycle state of a channel
    pub fn channel_state(&self, channel: ChannelId) -> ChannelState {
        self.inner.channels.lock()[channel.index()].state
    }

    /// Id of the track a channel has selected, if any
    pub fn selected_track(&self, channel: ChannelId) -> Option<String> {
        self.inner.channels.lock()[channel.index()]
            .source
            .as_ref()
            .map(|s| s.id().to_string())
    }

    /// Close both render surfaces (session teardown)
    pub fn close_sinks(&self) {
        let sinks = self.inner.sinks.lock();
        for handle in sinks.iter() {
            handle.close();
        }
    }

    /// Transition a channel to `Active` once its load settles, unless the
    /// channel was reselected while the load was in flight.
    fn finish_load(&self, channel: ChannelId, generation: u64, outcome: SourceState) {
        let mut channels = self.inner.channels.lock();
        let binding = &mut channels[channel.index()];

        if binding.generation != generation {
            debug!(
                "{} channel: discarding stale load result (generation {} < {})",
                channel, generation, binding.generation
            );
            return;
        }

        if let SourceState::Unavailable { reason } = &outcome {
            warn!("{} channel: track unavailable, showing nothing: {}", channel, reason);
        }

        binding.state = ChannelState::Active;

        // Deliver at the last known position right away so the display does
        // not wait for the next natural tick
        let cues = match (&outcome, binding.last_position) {
            (SourceState::Ready { index: Some(index) }, Some(position)) => index.query(position),
            _ => Vec::new(),
        };
        binding.last_cues = cues.clone();
        self.deliver(channel, cues);
    }

    fn deliver(&self, channel: ChannelId, cues: CueSet) {
        let sinks = self.inner.sinks.lock();
        sinks[channel.index()].show(cues);
    }
}
