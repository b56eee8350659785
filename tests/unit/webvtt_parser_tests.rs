/*!
 * Tests for WebVTT parsing
 */

use dualsub::cue::{CueAlign, CueContent};
use dualsub::errors::SubtitleError;
use dualsub::parsers::{self, SubtitleFormat};
use crate::common;

/// Test the signature line is mandatory
#[test]
fn test_parse_withoutSignature_shouldFailWithMalformedHeader() {
    let raw = "00:00:01.000 --> 00:00:03.000\nNo header\n";

    let result = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt);

    assert!(matches!(result, Err(SubtitleError::MalformedHeader(_))));
}

/// Test a minimal valid payload
#[test]
fn test_parse_withBasicPayload_shouldProduceCues() {
    let cues = parsers::parse(common::VTT_BASIC.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text(), "Hello");
    assert_eq!(cues[0].start_us, 1_000_000);
    assert_eq!(cues[1].text(), "World");
}

/// Test cue settings map onto the region hint
#[test]
fn test_parse_withCueSettings_shouldMapToRegion() {
    let cues = parsers::parse(common::VTT_BASIC.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    let region = cues[1].region.as_ref().expect("second cue has settings");
    assert_eq!(region.align, Some(CueAlign::Center));
    assert_eq!(region.position, Some(50.0));
    assert!(region.line.is_none());
}

/// Test cues without settings carry no region
#[test]
fn test_parse_withoutCueSettings_shouldHaveNoRegion() {
    let cues = parsers::parse(common::VTT_BASIC.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert!(cues[0].region.is_none());
}

/// Test NOTE and STYLE blocks are skipped
#[test]
fn test_parse_withNoteAndStyleBlocks_shouldSkipThem() {
    let raw = "WEBVTT\n\nNOTE a comment\nspanning lines\n\nSTYLE\n::cue { color: red }\n\n00:00:01.000 --> 00:00:02.000\nOnly cue\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Only cue");
}

/// Test optional cue identifier lines are accepted
#[test]
fn test_parse_withCueIdentifier_shouldParseCue() {
    let raw = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:02.000\nNamed cue\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Named cue");
}

/// Test the hours component is optional
#[test]
fn test_parse_withShortTimestamps_shouldParse() {
    let raw = "WEBVTT\n\n01:02.500 --> 01:04.000\nShort form\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_us, 62_500_000);
    assert_eq!(cues[0].end_us, 64_000_000);
}

/// Test malformed timing skips only the offending block
#[test]
fn test_parse_withMalformedTiming_shouldSkipBlock() {
    let raw = "WEBVTT\n\n00:00:01.000 -> 00:00:02.000\nBad arrow\n\n00:00:03.000 --> 00:00:04.000\nGood\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Good");
}

/// Test voice tags become styled spans
#[test]
fn test_parse_withVoiceTag_shouldCaptureVoice() {
    let raw = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n<v Speaker>Let's go.</v>\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    let CueContent::Styled(spans) = &cues[0].content else {
        panic!("expected styled content");
    };
    assert_eq!(spans[0].voice.as_deref(), Some("Speaker"));
    assert_eq!(spans[0].text, "Let's go.");
}

/// Test an hours-bearing cue lands at the right offset
#[test]
fn test_parse_withHoursTimestamp_shouldOffsetCorrectly() {
    let raw = "WEBVTT\n\n01:30:00.000 --> 01:30:05.000\nLate cue\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues[0].start_us, 5_400_000_000);
}

/// Test a signature followed by a text suffix is accepted
#[test]
fn test_parse_withSignatureSuffix_shouldParse() {
    let raw = "WEBVTT - generated by tooling\n\n00:00:01.000 --> 00:00:02.000\nHi\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::WebVtt).unwrap();

    assert_eq!(cues.len(), 1);
}
