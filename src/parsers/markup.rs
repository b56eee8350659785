//! Inline markup shared by the text-based formats.
//!
//! SubRip and WebVTT both allow a small HTML-like tag vocabulary inside cue
//! text (`<b>`, `<i>`, `<font color>`, WebVTT `<v>` voices and `<c>`
//! classes). Tags that carry no styling we can represent are stripped,
//! keeping their inner text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cue::{CueContent, StyledSpan};

static FONT_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^font\s+color\s*=\s*["']?([#\w]+)["']?"#).unwrap()
});

/// Style state carried while scanning a cue payload
#[derive(Debug, Clone, Default)]
struct StyleState {
    bold: u32,
    italic: u32,
    colors: Vec<String>,
    voice: Option<String>,
}

impl StyleState {
    fn span(&self, text: String) -> StyledSpan {
        StyledSpan {
            text,
            bold: self.bold > 0,
            italic: self.italic > 0,
            color: self.colors.last().cloned(),
            voice: self.voice.clone(),
        }
    }
}

/// Parse cue text with optional inline tags into cue content.
///
/// Untagged input comes back as `CueContent::Plain`; anything that produced
/// at least one styled run becomes `CueContent::Styled`.
pub fn parse_inline(text: &str) -> CueContent {
    let mut spans: Vec<StyledSpan> = Vec::new();
    let mut state = StyleState::default();
    let mut current = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let Some(close_rel) = rest[open..].find('>') else {
            // Unterminated tag, keep the remainder literally
            current.push_str(rest);
            rest = "";
            break;
        };

        current.push_str(&rest[..open]);
        let tag = &rest[open + 1..open + close_rel];
        rest = &rest[open + close_rel + 1..];

        // Flush the run accumulated under the style active before this tag.
        // Stripped tags split runs too; the merge pass below rejoins them.
        if !current.is_empty() {
            spans.push(state.span(decode_entities(&current)));
            current.clear();
        }
        apply_tag(tag, &mut state);
    }
    current.push_str(rest);

    if !current.is_empty() {
        spans.push(state.span(decode_entities(&current)));
    }

    // Merge adjacent runs with identical styling
    let mut merged: Vec<StyledSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last)
                if last.bold == span.bold
                    && last.italic == span.italic
                    && last.color == span.color
                    && last.voice == span.voice =>
            {
                last.text.push_str(&span.text);
            }
            _ => merged.push(span),
        }
    }

    if merged.len() == 1 && merged[0].is_plain() {
        CueContent::Plain(merged.remove(0).text)
    } else if merged.is_empty() {
        CueContent::Plain(String::new())
    } else {
        CueContent::Styled(merged)
    }
}

/// Apply a tag to the running style state. Tags outside the supported
/// vocabulary (`<u>`, `<ruby>`, inline timestamps, ...) leave the state
/// untouched and are thereby stripped.
fn apply_tag(tag: &str, state: &mut StyleState) {
    let tag = tag.trim();
    let lower = tag.to_lowercase();

    match lower.as_str() {
        "b" | "strong" => state.bold += 1,
        "/b" | "/strong" => state.bold = state.bold.saturating_sub(1),
        "i" | "em" => state.italic += 1,
        "/i" | "/em" => state.italic = state.italic.saturating_sub(1),
        "/font" | "/c" => {
            state.colors.pop();
        }
        "/v" => state.voice = None,
        _ => {
            if let Some(caps) = FONT_COLOR_REGEX.captures(tag) {
                state.colors.push(caps[1].to_lowercase());
            } else if let Some(classes) = lower.strip_prefix("c.") {
                // WebVTT class chains like c.yellow.bg_black; the first
                // class is conventionally the text color
                if let Some(color) = classes.split('.').next() {
                    state.colors.push(color.to_string());
                }
            } else if let Some(name) = tag.strip_prefix("v ").or_else(|| tag.strip_prefix("V ")) {
                state.voice = Some(name.trim().to_string());
            }
        }
    }
}

/// Decode the entity subset both formats require escaping for
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
