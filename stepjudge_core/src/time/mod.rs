pub mod conductor;

use chart_schema::Seconds;

use crate::traits::ClockSource;

/// Clock driven by hand, for tests and offline simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualClock {
    time: Seconds,
    playing: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            playing: true,
        }
    }

    pub fn set_time(&mut self, time: Seconds) {
        self.time = time;
    }

    pub fn advance(&mut self, dt: Seconds) {
        self.time += dt;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn start(&mut self) {
        self.playing = true;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Seconds {
        self.time
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
