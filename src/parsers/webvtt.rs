/*!
 * WebVTT (.vtt) parser.
 *
 * Requires the `WEBVTT` signature line. Cue blocks follow the same
 * permissive-skip policy as SubRip; `NOTE`, `STYLE` and `REGION` blocks are
 * ignored. Cue settings (`align`, `line`, `position`) map onto the cue's
 * region hint.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, warn};

use crate::cue::{Cue, CueAlign, CueRegion};
use crate::errors::SubtitleError;
use super::markup;

static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})\s*-->\s*(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})(.*)",
    )
    .unwrap()
});

/// Parse WebVTT text into cues, in non-decreasing start order
pub fn parse(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let mut lines = content.lines();

    match lines.next().map(str::trim) {
        Some(first) if first == "WEBVTT" || first.starts_with("WEBVTT ") || first.starts_with("WEBVTT\t") => {}
        other => {
            return Err(SubtitleError::MalformedHeader(format!(
                "missing WEBVTT signature, got {:?}",
                other.unwrap_or_default()
            )));
        }
    }

    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            parse_block(&block, &mut cues);
            block.clear();
        } else {
            block.push(line);
        }
    }
    parse_block(&block, &mut cues);

    cues.sort_by_key(|cue| (cue.start_us, cue.end_us));

    Ok(cues)
}

/// Parse one blank-line-delimited block, appending a cue when it is one
fn parse_block(block: &[&str], cues: &mut Vec<Cue>) {
    let Some(first) = block.first().map(|l| l.trim()) else {
        return;
    };

    // Non-cue blocks are skipped wholesale
    if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
        debug!("Skipping WebVTT {} block", first.split_whitespace().next().unwrap_or("?"));
        return;
    }

    // Optional cue identifier line precedes the timing line
    let timing_idx = if first.contains("-->") { 0 } else { 1 };
    let Some(timing_line) = block.get(timing_idx).map(|l| l.trim()) else {
        warn!("Skipping WebVTT block without a timing line: {:?}", first);
        return;
    };

    let Some(caps) = TIMING_REGEX.captures(timing_line) else {
        warn!("Skipping WebVTT block with malformed timing: {}", timing_line);
        return;
    };

    let start_us = timestamp_us(&caps, 1);
    let end_us = timestamp_us(&caps, 5);
    let region = parse_settings(caps.get(9).map_or("", |m| m.as_str()));

    let text = block[timing_idx + 1..].join("\n");
    if text.trim().is_empty() {
        warn!(
            "Skipping WebVTT cue with no payload at {}",
            crate::cue::format_timestamp(start_us)
        );
        return;
    }

    let content = markup::parse_inline(text.trim());
    match Cue::new_validated(start_us, end_us, content, region) {
        Ok(cue) => cues.push(cue),
        Err(e) => warn!("Skipping invalid WebVTT cue: {}", e),
    }
}

/// Convert captured timestamp components (hours optional) into microseconds
fn timestamp_us(caps: &regex::Captures, start_idx: usize) -> u64 {
    let part = |idx: usize| -> u64 {
        caps.get(start_idx + idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    let (hours, minutes, seconds, millis) = (part(0), part(1), part(2), part(3));
    ((hours * 3600 + minutes * 60 + seconds) * 1_000 + millis) * 1_000
}

/// Map cue settings onto a region hint; unknown settings are ignored
fn parse_settings(settings: &str) -> Option<CueRegion> {
    let mut region = CueRegion::default();

    for setting in settings.split_whitespace() {
        let Some((key, value)) = setting.split_once(':') else {
            continue;
        };

        match key {
            "align" => {
                region.align = match value {
                    "start" => Some(CueAlign::Start),
                    "center" | "middle" => Some(CueAlign::Center),
                    "end" => Some(CueAlign::End),
                    "left" => Some(CueAlign::Left),
                    "right" => Some(CueAlign::Right),
                    other => {
                        debug!("Ignoring unknown WebVTT align value: {}", other);
                        None
                    }
                };
            }
            "line" => region.line = parse_percentage(value),
            "position" => region.position = parse_percentage(value),
            _ => {}
        }
    }

    (!region.is_empty()).then_some(region)
}

/// Parse a `line:`/`position:` value, tolerating a trailing `%` and an
/// anchor suffix like `10%,start`
fn parse_percentage(value: &str) -> Option<f32> {
    let value = value.split(',').next().unwrap_or(value);
    value.trim_end_matches('%').parse::<f32>().ok()
}
