use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF64;
use chart_schema::Seconds;

use crate::traits::ClockSource;

/// Playback clock fed by the audio thread.
///
/// The audio thread publishes its position in coarse steps; between updates the
/// conductor extrapolates with system time. `begin_frame` latches one value per frame
/// and never lets it run backwards unless `seek` is called.
pub struct Conductor {
    audio_time_source: Arc<AtomicF64>,
    playing: Arc<AtomicBool>,
    last_audio_time: f64,
    last_update_time: f64,
    frame_time: f64,
}

impl Conductor {
    pub fn new(audio_time_source: Arc<AtomicF64>, playing: Arc<AtomicBool>) -> Self {
        Self {
            audio_time_source,
            playing,
            last_audio_time: 0.0,
            last_update_time: 0.0,
            frame_time: 0.0,
        }
    }

    pub fn update(&mut self, current_system_time: f64) {
        self.last_audio_time = self.audio_time_source.load(Ordering::Acquire);
        self.last_update_time = current_system_time;
    }

    pub fn get_time(&self, current_system_time: f64) -> f64 {
        if !self.playing.load(Ordering::Acquire) {
            return self.last_audio_time;
        }
        let elapsed = current_system_time - self.last_update_time;
        self.last_audio_time + elapsed
    }

    /// Samples the clock for this frame.
    pub fn begin_frame(&mut self, current_system_time: f64) {
        let t = self.get_time(current_system_time);
        self.frame_time = self.frame_time.max(t);
    }

    /// Jumps to `time`, allowing the clock to move backwards (restart or seek).
    pub fn seek(&mut self, time: Seconds, current_system_time: f64) {
        self.audio_time_source.store(time, Ordering::Release);
        self.last_audio_time = time;
        self.last_update_time = current_system_time;
        self.frame_time = time;
    }
}

impl ClockSource for Conductor {
    fn now(&self) -> Seconds {
        self.frame_time
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }
}
