use serde::{Deserialize, Serialize};

pub type Seconds = f64;

pub const DEFAULT_LANE_COUNT: usize = 4;
pub const DEFAULT_BPM: f64 = 120.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartNote {
    /// Absolute hit time in seconds from track start.
    pub time: Seconds,
    #[serde(rename = "laneIndex")]
    pub lane: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    #[serde(default)]
    pub notes: Vec<ChartNote>,
}

impl Chart {
    pub fn new(notes: Vec<ChartNote>) -> Self {
        Self { notes }
    }

    pub fn total_notes(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Points awarded for a Perfect on this chart, or `None` when the chart has no notes.
    pub fn per_note_score(&self, target_score: u64) -> Option<f64> {
        if self.notes.is_empty() {
            return None;
        }
        Some(target_score as f64 / self.notes.len() as f64)
    }

    /// Smallest lane count that covers every note in the chart.
    pub fn lane_count_hint(&self) -> usize {
        self.notes
            .iter()
            .map(|n| n.lane as usize + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn last_note_time(&self) -> Option<Seconds> {
        self.notes.iter().map(|n| n.time).reduce(f64::max)
    }
}

/// Difficulty name -> chart, kept in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    entries: Vec<(String, Chart)>,
}

impl ChartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a chart. A repeated name replaces the earlier chart but keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, chart: Chart) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = chart,
            None => self.entries.push((name, chart)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Chart> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn first(&self) -> Option<(&str, &Chart)> {
        self.entries.first().map(|(n, c)| (n.as_str(), c))
    }

    /// Returns the named chart, or the first chart when the name is unknown or absent.
    pub fn select(&self, name: Option<&str>) -> Option<(&str, &Chart)> {
        if let Some(name) = name {
            if let Some((n, c)) = self.entries.iter().find(|(n, _)| n == name) {
                return Some((n.as_str(), c));
            }
        }
        self.first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Chart)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Chart)> {
        self.entries
    }
}

/// Per-difficulty metadata owned by the song catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyMeta {
    pub display_name: String,
    #[serde(default)]
    pub bpm: f64,
    #[serde(default)]
    pub offset_seconds: Seconds,
}

impl DifficultyMeta {
    pub fn effective_bpm(&self) -> f64 {
        effective_bpm(self.bpm)
    }
}

/// Substitutes [`DEFAULT_BPM`] for non-positive or non-finite tempos.
pub fn effective_bpm(bpm: f64) -> f64 {
    if bpm.is_finite() && bpm > 0.0 {
        bpm
    } else {
        DEFAULT_BPM
    }
}
