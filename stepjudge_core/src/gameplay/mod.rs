pub mod judge;
pub mod scoring;

use chart_schema::Seconds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Perfect,
    Great,
    Good,
    Miss,
}

impl Tier {
    pub fn is_hit(self) -> bool {
        self != Tier::Miss
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Perfect => "Perfect",
            Tier::Great => "Great",
            Tier::Good => "Good",
            Tier::Miss => "Miss",
        }
    }
}

/// What produced a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgmentSource {
    /// A key press matched a note (hit, or a Miss when outside the good window).
    Press,
    /// A key press on a lane with no unhandled notes.
    EmptyLane,
    /// A note passed its hit moment by more than the good window.
    FellOff,
    /// A note still unhandled when playback ended.
    TrackEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentEvent {
    pub lane: usize,
    pub tier: Tier,
    pub points: u64,
    pub source: JudgmentSource,
    /// Index into the chart's note list; `None` for empty-lane presses.
    pub note_index: Option<usize>,
    pub note_time: Option<Seconds>,
    /// Press time minus hit moment. Negative is early. Only set for presses on a note.
    pub delta: Option<Seconds>,
}

impl JudgmentEvent {
    pub(crate) fn miss(lane: usize, source: JudgmentSource) -> Self {
        Self {
            lane,
            tier: Tier::Miss,
            points: 0,
            source,
            note_index: None,
            note_time: None,
            delta: None,
        }
    }
}
