/*!
 * SubRip (.srt) parser.
 *
 * Blocks are separated by blank lines; each block carries an advisory index
 * line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line, and one or more text
 * lines. Malformed blocks are skipped individually with a warning - a single
 * corrupt block must not poison the rest of the payload.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::cue::Cue;
use super::markup;

static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

/// Parse SubRip text into cues, in non-decreasing start order.
///
/// A payload with zero valid blocks yields an empty sequence - the caller
/// decides whether that is worth a user-visible warning.
pub fn parse(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    // State for the block currently being assembled
    let mut seen_index_line = false;
    let mut current_timing: Option<(u64, u64)> = None;
    let mut current_text = String::new();
    let mut line_number = 0;

    let mut finish_block = |timing: &mut Option<(u64, u64)>, text: &mut String, seen: &mut bool| {
        if let Some((start_us, end_us)) = timing.take() {
            if text.trim().is_empty() {
                warn!(
                    "Skipping SubRip block with no text at {}",
                    crate::cue::format_timestamp(start_us)
                );
            } else {
                let content = markup::parse_inline(text.trim());
                match Cue::new_validated(start_us, end_us, content, None) {
                    Ok(cue) => cues.push(cue),
                    Err(e) => warn!("Skipping invalid SubRip block: {}", e),
                }
            }
        }
        text.clear();
        *seen = false;
    };

    for line in content.lines() {
        line_number += 1;
        let trimmed = line.trim();

        // Blank line closes the current block
        if trimmed.is_empty() {
            finish_block(&mut current_timing, &mut current_text, &mut seen_index_line);
            continue;
        }

        // An advisory index line may open a block; it is never part of the text
        if current_timing.is_none() && !seen_index_line && trimmed.parse::<u64>().is_ok() {
            seen_index_line = true;
            continue;
        }

        // Timing line starts collecting text; the index line is optional
        if current_timing.is_none() {
            if let Some(caps) = TIMING_REGEX.captures(trimmed) {
                current_timing = Some((timestamp_us(&caps, 1), timestamp_us(&caps, 5)));
            } else {
                // Neither index nor timing where one was expected: the block
                // is malformed, skip lines until the next separator
                warn!(
                    "Skipping malformed SubRip line {} (expected timing): {}",
                    line_number, trimmed
                );
            }
            continue;
        }

        if !current_text.is_empty() {
            current_text.push('\n');
        }
        current_text.push_str(trimmed);
    }

    // Final block may not be terminated by a blank line
    finish_block(&mut current_timing, &mut current_text, &mut seen_index_line);

    // Tolerate out-of-order blocks by sorting on start time
    cues.sort_by_key(|cue| (cue.start_us, cue.end_us));

    cues
}

/// Convert four captured timestamp components into microseconds
fn timestamp_us(caps: &regex::Captures, start_idx: usize) -> u64 {
    let part = |idx: usize| -> u64 {
        caps.get(start_idx + idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    let (hours, minutes, seconds, millis) = (part(0), part(1), part(2), part(3));
    ((hours * 3600 + minutes * 60 + seconds) * 1_000 + millis) * 1_000
}
