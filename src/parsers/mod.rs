/*!
 * Format parsers turning raw subtitle bytes into ordered cue sequences.
 *
 * Supported formats:
 * - SubRip (`.srt`): block-structured, permissive per-block recovery
 * - WebVTT (`.vtt`): signature-checked, cue settings mapped to region hints
 *
 * Dispatch is driven by an explicit codec tag. Unknown tags fail with
 * `SubtitleError::UnsupportedFormat` rather than guessing a parser.
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use anyhow::anyhow;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::cue::Cue;
use crate::errors::SubtitleError;

mod markup;
pub mod subrip;
pub mod webvtt;

/// A subtitle format this pipeline can parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip (.srt)
    SubRip,
    /// WebVTT (.vtt)
    WebVtt,
}

impl SubtitleFormat {
    /// Resolve a declared codec tag to a format.
    ///
    /// Accepts the tags media backends commonly report (`srt`, `subrip`,
    /// `vtt`, `webvtt`), case-insensitive. Anything else is an
    /// `UnsupportedFormat` error - there is no fallback parser.
    pub fn from_codec_tag(tag: &str) -> Result<Self, SubtitleError> {
        match tag.trim().to_lowercase().as_str() {
            "srt" | "subrip" => Ok(Self::SubRip),
            "vtt" | "webvtt" => Ok(Self::WebVtt),
            other => Err(SubtitleError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Guess the format from a file extension, for sidecar discovery
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())?
            .as_str()
        {
            "srt" => Some(Self::SubRip),
            "vtt" => Some(Self::WebVtt),
            _ => None,
        }
    }

    /// Canonical codec tag for this format
    pub fn codec_tag(&self) -> &'static str {
        match self {
            Self::SubRip => "srt",
            Self::WebVtt => "vtt",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.codec_tag())
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::from_codec_tag(s).map_err(|e| anyhow!(e))
    }
}

/// Parse raw subtitle bytes into an ordered cue sequence.
///
/// The returned cues are in non-decreasing start order. Malformed cue
/// blocks are skipped individually; a payload with zero valid blocks
/// yields an empty sequence, not an error.
pub fn parse(raw: &[u8], format: SubtitleFormat) -> Result<Vec<Cue>, SubtitleError> {
    let text = decode_utf8(raw)?;

    let cues = match format {
        SubtitleFormat::SubRip => subrip::parse(text),
        SubtitleFormat::WebVtt => webvtt::parse(text)?,
    };

    if cues.is_empty() && !text.trim().is_empty() {
        warn!("No valid cues parsed from a non-empty {} payload", format);
    }

    Ok(cues)
}

/// Decode a payload as UTF-8, tolerating a leading BOM
fn decode_utf8(raw: &[u8]) -> Result<&str, SubtitleError> {
    let raw = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(raw);
    std::str::from_utf8(raw).map_err(|e| SubtitleError::Decode(e.to_string()))
}
