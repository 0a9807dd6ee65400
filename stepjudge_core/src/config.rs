use std::{fs, path::Path};

use anyhow::Context;
use chart_schema::{Seconds, DEFAULT_LANE_COUNT};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Everything a play session needs to know up front. Passed by value into
/// [`crate::session::Session::new`]; there is no process-wide settings state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Total points for a run where every note is Perfect.
    pub target_score: u64,

    // Half-width timing windows in seconds.
    pub perfect_window: Seconds,
    pub great_window: Seconds,
    pub good_window: Seconds,

    pub great_multiplier: f64,
    pub good_multiplier: f64,

    pub beats_on_screen: f64,
    /// Audio/input latency compensation. May be negative.
    pub audio_offset: Seconds,
    pub scroll_speed: f64,

    pub gain_per_hit: f64,
    pub loss_per_miss: f64,
    pub initial_life: f64,

    pub lane_count: usize,
    /// Keyboard keys for lanes 0..lane_count.
    pub lane_keys: Vec<char>,
    /// Whether pressing a lane with nothing left to hit counts as a Miss.
    pub miss_on_empty_lane: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_score: 1_000_000,
            perfect_window: 0.10,
            great_window: 0.25,
            good_window: 0.30,
            great_multiplier: 0.7,
            good_multiplier: 0.3,
            beats_on_screen: 4.0,
            audio_offset: 0.0,
            scroll_speed: 1.0,
            gain_per_hit: 0.05,
            loss_per_miss: 0.10,
            initial_life: 1.0,
            lane_count: DEFAULT_LANE_COUNT,
            lane_keys: vec!['d', 'f', 'j', 'k'],
            miss_on_empty_lane: true,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (perfect, great, good) = (self.perfect_window, self.great_window, self.good_window);
        if !(perfect > 0.0 && great > 0.0 && good > 0.0) {
            return Err(ConfigError::NonPositiveWindow {
                perfect,
                great,
                good,
            });
        }
        if !(perfect < great && great < good) {
            return Err(ConfigError::WindowsNotIncreasing {
                perfect,
                great,
                good,
            });
        }

        for (name, value) in [
            ("great_multiplier", self.great_multiplier),
            ("good_multiplier", self.good_multiplier),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::MultiplierOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("gain_per_hit", self.gain_per_hit),
            ("loss_per_miss", self.loss_per_miss),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeLifeDelta { name, value });
            }
        }

        if !(self.initial_life > 0.0 && self.initial_life <= 1.0) {
            return Err(ConfigError::InitialLifeOutOfRange(self.initial_life));
        }
        if !(self.beats_on_screen > 0.0) {
            return Err(ConfigError::NonPositiveBeatsOnScreen(self.beats_on_screen));
        }
        if self.target_score == 0 {
            return Err(ConfigError::ZeroTargetScore);
        }
        if self.lane_count == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if self.lane_keys.len() != self.lane_count {
            return Err(ConfigError::KeyBindingCount {
                keys: self.lane_keys.len(),
                lanes: self.lane_count,
            });
        }
        Ok(())
    }

    /// Loads a config file. A missing file yields the defaults; a partial file fills the
    /// remaining fields from the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        Ok(())
    }
}
