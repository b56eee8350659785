/*!
 * Tests for SubRip parsing
 */

use dualsub::cue::CueContent;
use dualsub::parsers::{self, SubtitleFormat};
use crate::common;

/// Test parsing the canonical single-block payload
#[test]
fn test_parse_withSingleBlock_shouldProduceOneCue() {
    let raw = "1\n00:00:01,000 --> 00:00:03,000\nHello\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_us, 1_000_000);
    assert_eq!(cues[0].end_us, 3_000_000);
    assert_eq!(cues[0].text(), "Hello");
}

/// Test multi-line text blocks keep their line breaks
#[test]
fn test_parse_withMultiLineText_shouldPreserveNewlines() {
    let raw = "1\n00:00:05,000 --> 00:00:08,000\nTest subtitle\nSecond line\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Test subtitle\nSecond line");
}

/// Test malformed-block skip: one corrupt block between two valid ones
#[test]
fn test_parse_withOneCorruptBlock_shouldKeepTwoCues() {
    let raw = "1\n00:00:01,000 --> 00:00:03,000\nFirst\n\n2\nnot a timing line\nBroken\n\n3\n00:00:05,000 --> 00:00:07,000\nThird\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text(), "First");
    assert_eq!(cues[1].text(), "Third");
}

/// Test a payload with zero valid blocks yields an empty sequence, not a failure
#[test]
fn test_parse_withNoValidBlocks_shouldYieldEmptySequence() {
    let raw = "garbage\nmore garbage\n\nstill not subrip\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert!(cues.is_empty());
}

/// Test the advisory index line is optional
#[test]
fn test_parse_withMissingIndexLine_shouldStillParse() {
    let raw = "00:00:01,000 --> 00:00:02,000\nNo index\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "No index");
}

/// Test out-of-order blocks are sorted by start time
#[test]
fn test_parse_withOutOfOrderBlocks_shouldSortByStart() {
    let raw = "2\n00:00:10,000 --> 00:00:12,000\nLater\n\n1\n00:00:01,000 --> 00:00:03,000\nEarlier\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text(), "Earlier");
    assert_eq!(cues[1].text(), "Later");
}

/// Test zero-duration blocks are rejected individually
#[test]
fn test_parse_withZeroDurationBlock_shouldSkipOnlyThatBlock() {
    let raw = "1\n00:00:01,000 --> 00:00:01,000\nDegenerate\n\n2\n00:00:02,000 --> 00:00:04,000\nFine\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text(), "Fine");
}

/// Test inline markup produces styled content
#[test]
fn test_parse_withItalicMarkup_shouldProduceStyledContent() {
    let raw = "1\n00:00:01,000 --> 00:00:03,000\n<i>Whispered</i> aloud\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    let CueContent::Styled(spans) = &cues[0].content else {
        panic!("expected styled content");
    };
    assert!(spans[0].italic);
    assert_eq!(spans[0].text, "Whispered");
    assert!(!spans[1].italic);
}

/// Test parsing is idempotent: same bytes, structurally equal output
#[test]
fn test_parse_withSameInputTwice_shouldBeStructurallyEqual() {
    let raw = common::SRT_BASIC.as_bytes();

    let first = parsers::parse(raw, SubtitleFormat::SubRip).unwrap();
    let second = parsers::parse(raw, SubtitleFormat::SubRip).unwrap();

    assert_eq!(first, second);
}

/// Test a UTF-8 BOM is tolerated
#[test]
fn test_parse_withBom_shouldParseNormally() {
    let mut raw = vec![0xEF, 0xBB, 0xBF];
    raw.extend_from_slice(common::SRT_BASIC.as_bytes());

    let cues = parsers::parse(&raw, SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 2);
}

/// Test invalid UTF-8 fails with a decode error
#[test]
fn test_parse_withInvalidUtf8_shouldFailWithDecodeError() {
    let raw = [0x31, 0x0A, 0xFF, 0xFE];

    let result = parsers::parse(&raw, SubtitleFormat::SubRip);

    assert!(matches!(
        result,
        Err(dualsub::errors::SubtitleError::Decode(_))
    ));
}

/// Test dot millisecond separators are accepted alongside commas
#[test]
fn test_parse_withDotMillisSeparator_shouldParse() {
    let raw = "1\n00:00:01.500 --> 00:00:03.500\nDotted\n";

    let cues = parsers::parse(raw.as_bytes(), SubtitleFormat::SubRip).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_us, 1_500_000);
}
