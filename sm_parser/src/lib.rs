//! StepMania `.sm` chart parsing.
//!
//! Every `#NOTES:` block becomes one [`Chart`] keyed by its difficulty name. Timing
//! uses a single constant tempo (the first `#BPMS:` pair) and the global `#OFFSET:`;
//! tempo changes and non-tap note types are not modeled.

mod error;
mod header;
mod parser;
mod time_map;

use std::{fs, path::Path};

use chart_schema::{Chart, ChartSet, DifficultyMeta, Seconds};
use log::{debug, warn};

pub use error::{ParseError, ParseErrorKind};

use crate::header::parse_header;
use crate::parser::{parse_block, split_blocks};
use crate::time_map::TimeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Simfile {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Resolved tempo used for every block.
    pub bpm: f64,
    pub offset: Seconds,
    pub charts: ChartSet,
    /// Problems that were recovered from while parsing.
    pub diagnostics: Vec<ParseError>,
}

impl Simfile {
    pub fn chart(&self, difficulty: &str) -> Option<&Chart> {
        self.charts.get(difficulty)
    }

    /// Timing metadata for a parsed difficulty. Every block shares the file's tempo
    /// and offset.
    pub fn meta(&self, difficulty: &str) -> Option<DifficultyMeta> {
        self.charts.get(difficulty).map(|_| DifficultyMeta {
            display_name: difficulty.to_string(),
            bpm: self.bpm,
            offset_seconds: self.offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub index: usize,
    pub line: usize,
    pub difficulty: Option<String>,
    pub note_count: usize,
    pub skipped: bool,
}

/// Parses every difficulty in `text`. Malformed blocks are skipped, so the result may be
/// partial or empty but the call never fails.
pub fn parse_all(text: &str) -> ChartSet {
    parse_simfile(text).charts
}

pub fn parse_simfile(text: &str) -> Simfile {
    let text = text.replace('\r', "");
    let mut diagnostics = Vec::new();
    let header = parse_header(&text, &mut diagnostics);
    let time_map = TimeMap::new(header.offset, header.bpm);

    let blocks = split_blocks(&text);
    if blocks.is_empty() {
        diagnostics.push(ParseError::new("E1001", "no #NOTES: section found"));
    }

    let mut charts = ChartSet::new();
    for block in &blocks {
        match parse_block(block, &time_map) {
            Ok(parsed) => {
                debug!(
                    "block {}: '{}' with {} notes",
                    block.index,
                    parsed.difficulty,
                    parsed.chart.total_notes()
                );
                charts.insert(parsed.difficulty, parsed.chart);
            }
            Err(e) => diagnostics.push(e),
        }
    }

    for d in &diagnostics {
        warn!("{d}");
    }

    Simfile {
        title: header.title,
        artist: header.artist,
        bpm: header.bpm,
        offset: header.offset,
        charts,
        diagnostics,
    }
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Simfile, ParseError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|e| {
        ParseError::new("E2001", format!("failed to read simfile: {e}"))
            .with_file(path.display().to_string())
    })?;
    Ok(parse_simfile(&src))
}

/// One summary per `#NOTES:` block, including skipped ones.
pub fn inspect(text: &str) -> Vec<BlockSummary> {
    let text = text.replace('\r', "");
    let header = parse_header(&text, &mut Vec::new());
    let time_map = TimeMap::new(header.offset, header.bpm);

    split_blocks(&text)
        .iter()
        .map(|block| match parse_block(block, &time_map) {
            Ok(parsed) => BlockSummary {
                index: block.index,
                line: block.line,
                difficulty: Some(parsed.difficulty),
                note_count: parsed.chart.total_notes(),
                skipped: false,
            },
            Err(_) => BlockSummary {
                index: block.index,
                line: block.line,
                difficulty: None,
                note_count: 0,
                skipped: true,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests;
