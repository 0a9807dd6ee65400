//! Seams between the engine and the presentation layer.

use chart_schema::Seconds;

use crate::gameplay::scoring::FinishReason;
use crate::gameplay::JudgmentEvent;
use crate::input::events::KeyDown;

/// Playback clock, sampled once per frame.
///
/// A paused clock should not be ticked; `is_playing() == false` is read as the end of
/// the track once anything has been judged.
pub trait ClockSource {
    fn now(&self) -> Seconds;
    fn is_playing(&self) -> bool;
}

/// Key-down events gathered since the previous frame, in arrival order.
pub trait InputSource {
    fn poll(&mut self, out: &mut Vec<KeyDown>);
}

pub trait JudgmentSink {
    fn on_judgment(&mut self, event: &JudgmentEvent);

    fn on_finished(&mut self, _reason: FinishReason) {}
}

impl JudgmentSink for Vec<JudgmentEvent> {
    fn on_judgment(&mut self, event: &JudgmentEvent) {
        self.push(event.clone());
    }
}

impl InputSource for Vec<KeyDown> {
    fn poll(&mut self, out: &mut Vec<KeyDown>) {
        out.append(self);
    }
}
