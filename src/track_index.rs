/*!
 * Immutable time-indexed cue lookup.
 *
 * A `TrackIndex` is built once per track from a parsed cue sequence and
 * answers "which cues are active at position T" on every playback tick.
 * Cues are kept sorted by start time alongside a running maximum of end
 * times, so a query is a binary search plus a bounded backward scan:
 * O(log n + k) for typical subtitle tracks where overlaps are short-lived.
 */

use std::sync::Arc;
use log::warn;

use crate::cue::{Cue, CueSet};

/// Immutable, queryable index over one track's cues
#[derive(Debug, Default)]
pub struct TrackIndex {
    /// Cues sorted by (start, end)
    cues: Vec<Arc<Cue>>,

    /// running_max_end[i] = max end_us over cues[0..=i]
    running_max_end: Vec<u64>,
}

impl TrackIndex {
    /// Build an index from a parsed cue sequence.
    ///
    /// Input tolerates unsorted order. Cues violating the interval
    /// invariant (`end <= start`) are dropped with a warning rather than
    /// failing the track - a single bad cue must not poison the rest.
    pub fn build(cues: Vec<Cue>) -> Self {
        let mut kept: Vec<Arc<Cue>> = Vec::with_capacity(cues.len());

        for cue in cues {
            if cue.end_us <= cue.start_us {
                warn!(
                    "Dropping cue with empty interval [{}, {})",
                    cue.start_us, cue.end_us
                );
                continue;
            }
            kept.push(Arc::new(cue));
        }

        kept.sort_by_key(|cue| (cue.start_us, cue.end_us));

        let mut running_max_end = Vec::with_capacity(kept.len());
        let mut max_end = 0u64;
        for cue in &kept {
            max_end = max_end.max(cue.end_us);
            running_max_end.push(max_end);
        }

        TrackIndex {
            cues: kept,
            running_max_end,
        }
    }

    /// All cues whose half-open interval `[start, end)` contains
    /// `position_us`, in start order. Empty when nothing matches.
    pub fn query(&self, position_us: u64) -> CueSet {
        // First cue that starts strictly after the position
        let upper = self.cues.partition_point(|cue| cue.start_us <= position_us);

        let mut active: CueSet = Vec::new();
        for i in (0..upper).rev() {
            // No cue at or before i can still be active once the running
            // maximum of end times drops to the position
            if self.running_max_end[i] <= position_us {
                break;
            }
            if self.cues[i].end_us > position_us {
                active.push(Arc::clone(&self.cues[i]));
            }
        }

        active.reverse();
        active
    }

    /// Number of indexed cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the track has no cues at all
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// The indexed cues in start order
    pub fn cues(&self) -> &[Arc<Cue>] {
        &self.cues
    }

    /// Overall `[first start, max end)` span of the track, if non-empty
    pub fn span(&self) -> Option<(u64, u64)> {
        let first = self.cues.first()?;
        let max_end = *self.running_max_end.last()?;
        Some((first.start_us, max_end))
    }
}
