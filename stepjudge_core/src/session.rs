use std::mem;

use chart_schema::{Chart, Seconds, DEFAULT_BPM};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{JudgeError, RestoreError, SessionError};
use crate::gameplay::judge::{JudgeEngine, JudgeState};
use crate::gameplay::scoring::{Phase, ScoreSnapshot, ScoreState};
use crate::gameplay::JudgmentEvent;
use crate::input::events::KeyDown;
use crate::timing::approach_time;
use crate::traits::{ClockSource, InputSource, JudgmentSink};

/// Pause/resume snapshot of everything a session mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub judge: JudgeState,
    pub score: ScoreState,
}

/// One play-through of one chart, driven once per frame.
pub struct Session {
    config: SessionConfig,
    judge: JudgeEngine,
    score: ScoreState,
    approach_time: Seconds,
    pending: Vec<KeyDown>,
}

impl Session {
    pub fn new(chart: &Chart, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let judge = JudgeEngine::new(chart, &config).ok_or(SessionError::EmptyChart)?;
        let score = ScoreState::new(judge.per_note_score(), &config);
        let approach_time = approach_time(DEFAULT_BPM, config.beats_on_screen, config.scroll_speed);
        info!(
            "session ready: {} notes, {:.2} points per note",
            judge.note_count(),
            judge.per_note_score()
        );

        Ok(Self {
            config,
            judge,
            score,
            approach_time,
            pending: Vec::new(),
        })
    }

    /// Sets the chart tempo used for the approach time.
    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.approach_time = approach_time(bpm, self.config.beats_on_screen, self.config.scroll_speed);
        self
    }

    /// Runs one frame: key presses in arrival order, then the fall-off sweep, then the
    /// end-of-track check.
    pub fn tick<C, I, S>(&mut self, clock: &C, input: &mut I, sink: &mut S) -> Phase
    where
        C: ClockSource + ?Sized,
        I: InputSource + ?Sized,
        S: JudgmentSink + ?Sized,
    {
        if self.is_finished() {
            return self.phase();
        }
        let now = clock.now();

        let mut presses = mem::take(&mut self.pending);
        presses.clear();
        input.poll(&mut presses);
        for key in &presses {
            match self.press(key.lane, now) {
                Ok(Some(event)) => {
                    sink.on_judgment(&event);
                    if self.notify_finished(sink) {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("ignoring key press: {e}"),
            }
        }
        self.pending = presses;
        if self.is_finished() {
            return self.phase();
        }

        for event in self.sweep(now) {
            sink.on_judgment(&event);
        }
        if self.notify_finished(sink) {
            return self.phase();
        }

        if !clock.is_playing() {
            for event in self.end_of_track() {
                sink.on_judgment(&event);
            }
            self.notify_finished(sink);
        }
        self.phase()
    }

    /// Judges a single press and applies it to the score.
    pub fn press(&mut self, lane: usize, now: Seconds) -> Result<Option<JudgmentEvent>, JudgeError> {
        if self.is_finished() {
            return Ok(None);
        }
        let event = self.judge.try_hit(lane, now)?;
        if let Some(event) = &event {
            self.score.on_judgment(event);
        }
        Ok(event)
    }

    /// Misses every note that fell past the hit line by `now`.
    pub fn sweep(&mut self, now: Seconds) -> Vec<JudgmentEvent> {
        if self.is_finished() {
            return Vec::new();
        }
        let due = self.judge.due_misses(now);
        self.apply_misses(due)
    }

    /// Handles playback having stopped. Does nothing before the first judgment; otherwise
    /// misses any notes that were never reached and finishes the session.
    pub fn end_of_track(&mut self) -> Vec<JudgmentEvent> {
        if self.is_finished() || self.score.attempts() == 0 {
            return Vec::new();
        }

        let leftovers = self.judge.remaining_misses();
        if !leftovers.is_empty() {
            warn!("playback ended with {} unjudged notes", leftovers.len());
        }
        let applied = self.apply_misses(leftovers);
        self.score.on_playback_stopped();
        applied
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            judge: self.judge.state(),
            score: self.score.clone(),
        }
    }

    pub fn restore(&mut self, checkpoint: &Checkpoint) -> Result<(), RestoreError> {
        self.judge.check_state(&checkpoint.judge)?;
        if !self.score.same_rules(&checkpoint.score) {
            return Err(RestoreError::ScoringMismatch);
        }
        self.judge.restore(&checkpoint.judge)?;
        self.score = checkpoint.score.clone();
        debug!(
            "restored checkpoint: {} notes left, score {}",
            self.judge.unhandled_count(),
            self.score.score()
        );
        Ok(())
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        self.score.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.score.phase()
    }

    pub fn is_finished(&self) -> bool {
        self.score.is_finished()
    }

    pub fn approach_time(&self) -> Seconds {
        self.approach_time
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn judge(&self) -> &JudgeEngine {
        &self.judge
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Marks and scores misses in order. Stops at the judgment that ends the session, so
    /// every handled note has been scored.
    fn apply_misses(&mut self, misses: Vec<JudgmentEvent>) -> Vec<JudgmentEvent> {
        let mut applied = Vec::new();
        for event in misses {
            if let Some(idx) = event.note_index {
                self.judge.mark_handled(idx);
            }
            self.score.on_judgment(&event);
            applied.push(event);
            if self.is_finished() {
                break;
            }
        }
        applied
    }

    fn notify_finished<S: JudgmentSink + ?Sized>(&self, sink: &mut S) -> bool {
        if let Phase::Finished(reason) = self.phase() {
            sink.on_finished(reason);
            return true;
        }
        false
    }
}
