use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("timing windows must be positive (perfect={perfect}, great={great}, good={good})")]
    NonPositiveWindow { perfect: f64, great: f64, good: f64 },

    #[error("timing windows must strictly increase (perfect={perfect}, great={great}, good={good})")]
    WindowsNotIncreasing { perfect: f64, great: f64, good: f64 },

    #[error("{name} must be in (0, 1), got {value}")]
    MultiplierOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be >= 0, got {value}")]
    NegativeLifeDelta { name: &'static str, value: f64 },

    #[error("initial_life must be in (0, 1], got {0}")]
    InitialLifeOutOfRange(f64),

    #[error("beats_on_screen must be > 0, got {0}")]
    NonPositiveBeatsOnScreen(f64),

    #[error("target_score must be > 0")]
    ZeroTargetScore,

    #[error("lane_count must be > 0")]
    ZeroLanes,

    #[error("{keys} lane keys bound for {lanes} lanes")]
    KeyBindingCount { keys: usize, lanes: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JudgeError {
    #[error("lane {lane} is out of range (lane count {lane_count})")]
    InvalidLane { lane: usize, lane_count: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no valid chart: chart has no notes")]
    EmptyChart,

    #[error("invalid session config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Judge(#[from] JudgeError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestoreError {
    #[error("checkpoint holds {found} notes but the session chart has {expected}")]
    NoteCountMismatch { expected: usize, found: usize },

    #[error("checkpoint was taken on a different chart")]
    ChartMismatch,

    #[error("checkpoint was taken with different scoring rules")]
    ScoringMismatch,
}
