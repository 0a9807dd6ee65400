use log::info;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::gameplay::{JudgmentEvent, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Life reached zero.
    LifeDepleted,
    /// Playback ended with at least one note judged.
    TrackComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Active,
    Finished(FinishReason),
}

/// Per-frame view of the session for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Percentage in [0, 100].
    pub accuracy: f64,
    pub life: f64,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    pub attempts: u32,
}

/// Score, combo, accuracy and life bookkeeping.
///
/// `Active` moves to `Finished` once, either when life hits zero or when playback stops
/// after at least one judgment. Judgments arriving after that are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    per_note_score: f64,
    gain_per_hit: f64,
    loss_per_miss: f64,

    score: u64,
    combo: u32,
    max_combo: u32,
    attempts: u32,
    perfect: u32,
    great: u32,
    good: u32,
    miss: u32,
    life: f64,
    phase: Phase,
}

impl ScoreState {
    /// `config` is expected to have passed [`SessionConfig::validate`]; life deltas are
    /// used as given.
    pub fn new(per_note_score: f64, config: &SessionConfig) -> Self {
        Self {
            per_note_score,
            gain_per_hit: config.gain_per_hit,
            loss_per_miss: config.loss_per_miss,
            score: 0,
            combo: 0,
            max_combo: 0,
            attempts: 0,
            perfect: 0,
            great: 0,
            good: 0,
            miss: 0,
            life: config.initial_life.clamp(0.0, 1.0),
            phase: Phase::Active,
        }
    }

    /// Applies one judgment. Returns the finish reason if this judgment ended the session.
    pub fn on_judgment(&mut self, event: &JudgmentEvent) -> Option<FinishReason> {
        self.on_hit(event.tier, event.points)
    }

    pub fn on_hit(&mut self, tier: Tier, points: u64) -> Option<FinishReason> {
        if tier == Tier::Miss {
            return self.on_miss();
        }
        if self.is_finished() {
            return None;
        }

        self.score = self.score.saturating_add(points);
        if points > 0 {
            self.combo = self.combo.saturating_add(1);
            self.max_combo = self.max_combo.max(self.combo);
        }
        self.attempts = self.attempts.saturating_add(1);
        match tier {
            Tier::Perfect => self.perfect = self.perfect.saturating_add(1),
            Tier::Great => self.great = self.great.saturating_add(1),
            _ => self.good = self.good.saturating_add(1),
        }
        self.change_life(self.gain_per_hit);
        None
    }

    pub fn on_miss(&mut self) -> Option<FinishReason> {
        if self.is_finished() {
            return None;
        }

        self.combo = 0;
        self.attempts = self.attempts.saturating_add(1);
        self.miss = self.miss.saturating_add(1);
        self.change_life(-self.loss_per_miss);

        if self.life <= 0.0 {
            return self.finish(FinishReason::LifeDepleted);
        }
        None
    }

    /// Called when the playback clock reports it is no longer playing. Before the first
    /// judgment this is treated as "not started yet" and ignored.
    pub fn on_playback_stopped(&mut self) -> Option<FinishReason> {
        if self.is_finished() || self.attempts == 0 {
            return None;
        }
        self.finish(FinishReason::TrackComplete)
    }

    /// Score-ratio accuracy, so Great and Good hits count partially.
    pub fn accuracy(&self) -> f64 {
        let possible = self.per_note_score * self.attempts as f64;
        if self.attempts == 0 || possible <= 0.0 {
            return 100.0;
        }
        (self.score as f64 / possible).clamp(0.0, 1.0) * 100.0
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            accuracy: self.accuracy(),
            life: self.life,
            perfect: self.perfect,
            great: self.great,
            good: self.good,
            miss: self.miss,
            attempts: self.attempts,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn life(&self) -> f64 {
        self.life
    }

    pub fn per_note_score(&self) -> f64 {
        self.per_note_score
    }

    /// Whether `other` was built for the same per-note score and life deltas.
    pub fn same_rules(&self, other: &ScoreState) -> bool {
        self.per_note_score.to_bits() == other.per_note_score.to_bits()
            && self.gain_per_hit.to_bits() == other.gain_per_hit.to_bits()
            && self.loss_per_miss.to_bits() == other.loss_per_miss.to_bits()
    }

    fn change_life(&mut self, delta: f64) {
        self.life = (self.life + delta).clamp(0.0, 1.0);
    }

    fn finish(&mut self, reason: FinishReason) -> Option<FinishReason> {
        info!(
            "session finished ({reason:?}): score={} accuracy={:.1}% max_combo={}",
            self.score,
            self.accuracy(),
            self.max_combo
        );
        self.phase = Phase::Finished(reason);
        Some(reason)
    }
}
