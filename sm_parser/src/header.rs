use chart_schema::{Seconds, DEFAULT_BPM};

use crate::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Header {
    pub(crate) title: Option<String>,
    pub(crate) artist: Option<String>,
    pub(crate) bpm: f64,
    pub(crate) offset: Seconds,
}

/// Reads the global tags. Missing or unreadable tempo/offset values fall back to
/// defaults and are recorded in `diagnostics`.
pub(crate) fn parse_header(text: &str, diagnostics: &mut Vec<ParseError>) -> Header {
    let title = tag_value(text, "TITLE").map(|(v, _)| v.trim().to_string()).filter(|s| !s.is_empty());
    let artist = tag_value(text, "ARTIST").map(|(v, _)| v.trim().to_string()).filter(|s| !s.is_empty());

    let offset = match tag_value(text, "OFFSET") {
        None => 0.0,
        Some((raw, line)) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                diagnostics.push(
                    ParseError::new("W3002", format!("invalid #OFFSET value '{}', using 0", raw.trim()))
                        .with_line(line),
                );
                0.0
            }
        },
    };

    let bpm = match tag_value(text, "BPMS") {
        None => {
            diagnostics.push(ParseError::new(
                "W3001",
                format!("missing #BPMS, using {DEFAULT_BPM}"),
            ));
            DEFAULT_BPM
        }
        Some((raw, line)) => match first_bpm(raw) {
            Some(bpm) => bpm,
            None => {
                diagnostics.push(
                    ParseError::new(
                        "W3001",
                        format!("invalid #BPMS value '{}', using {DEFAULT_BPM}", raw.trim()),
                    )
                    .with_line(line),
                );
                DEFAULT_BPM
            }
        },
    };

    Header {
        title,
        artist,
        bpm,
        offset,
    }
}

/// Tempo of the first `beat=bpm` pair. Later tempo changes are not modeled.
fn first_bpm(raw: &str) -> Option<f64> {
    let first_pair = raw.split(',').next()?;
    let (_beat, bpm) = first_pair.split_once('=')?;
    let bpm: f64 = bpm.trim().parse().ok()?;
    (bpm.is_finite() && bpm > 0.0).then_some(bpm)
}

/// Value between `#TAG:` and the next `;`, plus the 1-based line of the tag.
fn tag_value<'a>(text: &'a str, tag: &str) -> Option<(&'a str, usize)> {
    let needle = format!("#{tag}:");
    let start = text.find(&needle)?;
    let value_start = start + needle.len();
    let len = text[value_start..].find(';')?;
    let line = line_of(text, start);
    Some((&text[value_start..value_start + len], line))
}

pub(crate) fn line_of(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos].matches('\n').count() + 1
}
