use std::fmt;
use std::sync::Arc;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Timed, styled subtitle cue model.
///
/// A cue is active over the half-open interval `[start_us, end_us)`.
/// Timestamps are microsecond offsets from the start of the media item.

/// Horizontal text alignment hint for a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueAlign {
    /// Aligned to the text start edge
    Start,
    /// Centered
    Center,
    /// Aligned to the text end edge
    End,
    /// Left edge of the video box
    Left,
    /// Right edge of the video box
    Right,
}

/// Positioning hint carried by a cue, independent of which channel
/// (primary/secondary) eventually displays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CueRegion {
    /// Horizontal alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<CueAlign>,

    /// Vertical line offset as a percentage of the viewport (0–100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<f32>,

    /// Horizontal position as a percentage of the viewport (0–100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f32>,
}

impl CueRegion {
    /// Whether no hint was actually set
    pub fn is_empty(&self) -> bool {
        self.align.is_none() && self.line.is_none() && self.position.is_none()
    }
}

/// One run of text with optional style overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    /// The text of this run
    pub text: String,

    /// Bold style
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Italic style
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,

    /// Color override (CSS color name or #rrggbb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Speaker label from a WebVTT voice tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl StyledSpan {
    /// Create an unstyled run
    pub fn plain(text: impl Into<String>) -> Self {
        StyledSpan {
            text: text.into(),
            bold: false,
            italic: false,
            color: None,
            voice: None,
        }
    }

    /// Whether this run carries any styling at all
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && self.color.is_none() && self.voice.is_none()
    }
}

/// Cue text content: either plain text or a sequence of styled runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueContent {
    /// Unstyled text, newlines preserved
    Plain(String),
    /// Styled text runs in display order
    Styled(Vec<StyledSpan>),
}

impl CueContent {
    /// Flatten the content to plain text, dropping style information
    pub fn to_plain_text(&self) -> String {
        match self {
            CueContent::Plain(text) => text.clone(),
            CueContent::Styled(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
        }
    }

    /// Whether the content is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.to_plain_text().trim().is_empty()
    }
}

/// A single timed subtitle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start of the active interval, microseconds
    pub start_us: u64,

    /// End of the active interval, microseconds (exclusive)
    pub end_us: u64,

    /// Displayable content
    pub content: CueContent,

    /// Optional positioning hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<CueRegion>,
}

impl Cue {
    /// Creates a new cue without validation - used by tests and builders
    #[allow(dead_code)]
    pub fn new(start_us: u64, end_us: u64, content: CueContent) -> Self {
        Cue {
            start_us,
            end_us,
            content,
            region: None,
        }
    }

    /// Creates a validated cue, rejecting empty intervals and blank content
    pub fn new_validated(
        start_us: u64,
        end_us: u64,
        content: CueContent,
        region: Option<CueRegion>,
    ) -> Result<Self> {
        if end_us <= start_us {
            return Err(anyhow!(
                "Invalid cue interval: end {} <= start {}",
                end_us,
                start_us
            ));
        }

        if content.is_blank() {
            return Err(anyhow!("Blank cue content at {}", format_timestamp(start_us)));
        }

        Ok(Cue {
            start_us,
            end_us,
            content,
            region: region.filter(|r| !r.is_empty()),
        })
    }

    /// Whether `position_us` falls inside the half-open active interval
    pub fn contains(&self, position_us: u64) -> bool {
        position_us >= self.start_us && position_us < self.end_us
    }

    /// Flattened plain text of this cue
    pub fn text(&self) -> String {
        self.content.to_plain_text()
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {}  {}",
            format_timestamp(self.start_us),
            format_timestamp(self.end_us),
            self.text().replace('\n', " | ")
        )
    }
}

/// The set of cues delivered to one render sink for one position.
///
/// Cues are shared out of the immutable track index, so a set is cheap to
/// clone and compare.
pub type CueSet = Vec<Arc<Cue>>;

/// Format a microsecond offset as `HH:MM:SS.mmm`
pub fn format_timestamp(us: u64) -> String {
    let ms = us / 1_000;
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
