//! Pure timing derivations shared by the judge and the presentation layer.

use chart_schema::{effective_bpm, Seconds};

pub const DEFAULT_SCROLL_SPEED: f64 = 1.0;

/// Seconds between a note appearing on screen and its hit moment.
///
/// Non-positive `bpm` and `scroll_speed` fall back to 120 and 1 so the result is always
/// finite and non-negative for a positive `beats_on_screen`.
pub fn approach_time(bpm: f64, beats_on_screen: f64, scroll_speed: f64) -> Seconds {
    let bpm = effective_bpm(bpm);
    let speed = if scroll_speed.is_finite() && scroll_speed > 0.0 {
        scroll_speed
    } else {
        DEFAULT_SCROLL_SPEED
    };
    beats_on_screen * (60.0 / bpm) / speed
}

/// Playback time at which a note should be pressed, after latency compensation.
pub fn hit_moment(note_time: Seconds, audio_offset: Seconds) -> Seconds {
    note_time - audio_offset
}

/// Fall progress of a note: 0 when it spawns, 1 when it reaches the hit line.
/// Values outside [0, 1] mean not yet visible or already past the line.
pub fn approach_progress(now: Seconds, hit_time: Seconds, approach_time: Seconds) -> f64 {
    if approach_time <= 0.0 {
        return if now >= hit_time { 1.0 } else { 0.0 };
    }
    (now - (hit_time - approach_time)) / approach_time
}
