use chart_schema::{Chart, ChartNote, DEFAULT_LANE_COUNT};

use crate::header::line_of;
use crate::time_map::TimeMap;
use crate::ParseError;

pub(crate) const NOTES_DELIMITER: &str = "#NOTES:";

/// Header lines preceding the note body of a block.
const BLOCK_HEADER_LINES: usize = 5;
/// Header line that carries the difficulty name.
const DIFFICULTY_LINE: usize = 2;

#[derive(Debug, Clone)]
pub(crate) struct RawBlock<'a> {
    /// 1-based block index in source order.
    pub(crate) index: usize,
    pub(crate) line: usize,
    pub(crate) text: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedBlock {
    pub(crate) difficulty: String,
    pub(crate) chart: Chart,
}

/// Segments following each `#NOTES:` delimiter. Text before the first delimiter is the
/// global header and is not a block.
pub(crate) fn split_blocks(text: &str) -> Vec<RawBlock<'_>> {
    let starts: Vec<usize> = text.match_indices(NOTES_DELIMITER).map(|(i, _)| i).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let body_start = start + NOTES_DELIMITER.len();
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            RawBlock {
                index: i + 1,
                line: line_of(text, start),
                text: &text[body_start..end],
            }
        })
        .collect()
}

pub(crate) fn parse_block(block: &RawBlock<'_>, time_map: &TimeMap) -> Result<ParsedBlock, ParseError> {
    let lines: Vec<&str> = block.text.split('\n').collect();
    if lines.len() <= BLOCK_HEADER_LINES {
        return Err(ParseError::new(
            "E1002",
            format!(
                "block header too short ({} lines, need at least {})",
                lines.len(),
                BLOCK_HEADER_LINES + 1
            ),
        )
        .with_block(block.index)
        .with_line(block.line));
    }

    let difficulty = lines[DIFFICULTY_LINE]
        .trim()
        .trim_end_matches(':')
        .to_string();

    let body = lines[BLOCK_HEADER_LINES..]
        .iter()
        .take_while(|l| l.trim() != ";")
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    let mut notes = Vec::new();
    for (m, measure) in body.split(',').enumerate() {
        let rows: Vec<&str> = measure
            .split('\n')
            .map(|row| strip_comment(row).trim())
            .filter(|row| !row.is_empty())
            .collect();
        let row_count = rows.len();

        for (r, row) in rows.iter().enumerate() {
            let cells = row.as_bytes();
            if cells.len() < DEFAULT_LANE_COUNT {
                continue;
            }
            for (lane, &cell) in cells.iter().take(DEFAULT_LANE_COUNT).enumerate() {
                if cell == b'1' {
                    notes.push(ChartNote {
                        time: time_map.row_time(m, r, row_count),
                        lane: lane as u8,
                    });
                }
            }
        }
    }

    Ok(ParsedBlock {
        difficulty,
        chart: Chart::new(notes),
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}
