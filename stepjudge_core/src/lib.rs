//! Timing, judgment and scoring for four-lane tap charts.
//!
//! The engine is polled once per frame from a single thread. It consumes a playback
//! clock and lane key-down events and produces judgment events plus a score/life
//! snapshot; rendering, audio and input devices live outside this crate.

pub mod chart;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod session;
pub mod time;
pub mod timing;
pub mod traits;

pub use config::SessionConfig;
pub use error::{ConfigError, JudgeError, RestoreError, SessionError};
pub use gameplay::judge::{JudgeEngine, TimingWindows};
pub use gameplay::scoring::{FinishReason, Phase, ScoreSnapshot, ScoreState};
pub use gameplay::{JudgmentEvent, JudgmentSource, Tier};
pub use session::{Checkpoint, Session};
pub use traits::{ClockSource, InputSource, JudgmentSink};
