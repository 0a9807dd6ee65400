use std::hash::Hasher;

use chart_schema::{Chart, ChartNote, Seconds};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::chart::LaneMap;
use crate::config::SessionConfig;
use crate::error::{JudgeError, RestoreError};
use crate::gameplay::{JudgmentEvent, JudgmentSource, Tier};
use crate::timing::hit_moment;

/// Nested half-width windows in seconds; boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub perfect: Seconds,
    pub great: Seconds,
    pub good: Seconds,
}

impl TimingWindows {
    pub fn classify(&self, abs_delta: Seconds) -> Tier {
        if abs_delta <= self.perfect {
            Tier::Perfect
        } else if abs_delta <= self.great {
            Tier::Great
        } else if abs_delta <= self.good {
            Tier::Good
        } else {
            Tier::Miss
        }
    }
}

/// Matches key presses to notes and detects notes that fell past the hit line.
///
/// The chart's notes are copied in and never modified; the engine owns one `handled`
/// flag per note, set exactly once.
pub struct JudgeEngine {
    notes: Vec<ChartNote>,
    lanes: LaneMap,
    /// Per lane: position in `lanes` of the first note that may still be unhandled.
    cursors: Vec<usize>,
    handled: Vec<bool>,
    lane_count: usize,
    fingerprint: u64,

    windows: TimingWindows,
    per_note_score: f64,
    great_multiplier: f64,
    good_multiplier: f64,
    audio_offset: Seconds,
    miss_on_empty_lane: bool,
}

/// Serializable copy of the engine's mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeState {
    pub handled: Vec<bool>,
    /// [`chart_fingerprint`] of the chart the flags belong to.
    pub chart_fingerprint: u64,
}

impl JudgeEngine {
    /// Returns `None` for a chart without notes.
    pub fn new(chart: &Chart, config: &SessionConfig) -> Option<Self> {
        let per_note_score = chart.per_note_score(config.target_score)?;
        let lanes = LaneMap::build(&chart.notes, config.lane_count);
        if lanes.width() > config.lane_count {
            warn!(
                "chart uses {} lanes but only {} are playable; extra notes can only be missed",
                lanes.width(),
                config.lane_count
            );
        }

        Some(Self {
            notes: chart.notes.clone(),
            cursors: vec![0; lanes.width()],
            lanes,
            handled: vec![false; chart.notes.len()],
            lane_count: config.lane_count,
            fingerprint: chart_fingerprint(&chart.notes),
            windows: TimingWindows {
                perfect: config.perfect_window,
                great: config.great_window,
                good: config.good_window,
            },
            per_note_score,
            great_multiplier: config.great_multiplier,
            good_multiplier: config.good_multiplier,
            audio_offset: config.audio_offset,
            miss_on_empty_lane: config.miss_on_empty_lane,
        })
    }

    /// Judges a key press on `lane` at playback time `now` against the nearest unhandled
    /// note in that lane. Ties go to the earlier note.
    ///
    /// `Ok(None)` means the press was ignored: the lane had nothing left to hit and
    /// empty-lane presses are not counted as misses.
    pub fn try_hit(&mut self, lane: usize, now: Seconds) -> Result<Option<JudgmentEvent>, JudgeError> {
        if lane >= self.lane_count {
            return Err(JudgeError::InvalidLane {
                lane,
                lane_count: self.lane_count,
            });
        }
        self.advance_cursor(lane);

        let Some((idx, delta)) = self.nearest_unhandled(lane, now) else {
            if self.miss_on_empty_lane {
                debug!("lane {lane}: press at {now:.3} with nothing to hit");
                return Ok(Some(JudgmentEvent::miss(lane, JudgmentSource::EmptyLane)));
            }
            return Ok(None);
        };

        self.handled[idx] = true;
        let tier = self.windows.classify(delta.abs());
        let points = self.points_for(tier);
        debug!(
            "lane {lane}: note {idx} judged {} ({:+.1} ms)",
            tier.label(),
            delta * 1000.0
        );

        Ok(Some(JudgmentEvent {
            lane,
            tier,
            points,
            source: JudgmentSource::Press,
            note_index: Some(idx),
            note_time: Some(self.notes[idx].time),
            delta: Some(delta),
        }))
    }

    /// Marks every unhandled note whose hit moment is more than the good window behind
    /// `now` as missed. Events come back in chronological order.
    pub fn sweep_misses(&mut self, now: Seconds) -> Vec<JudgmentEvent> {
        let results = self.due_misses(now);
        self.mark_all(&results);
        results
    }

    /// Marks every remaining note as missed. Used when playback ends early.
    pub fn flush_unhandled(&mut self) -> Vec<JudgmentEvent> {
        let results = self.remaining_misses();
        self.mark_all(&results);
        results
    }

    /// Same notes as [`Self::sweep_misses`], without marking them. Callers that may stop
    /// partway through apply each one with [`Self::mark_handled`].
    pub fn due_misses(&self, now: Seconds) -> Vec<JudgmentEvent> {
        let mut results = Vec::new();

        for lane in 0..self.lanes.width() {
            for &idx in &self.lanes.lane(lane)[self.cursors[lane]..] {
                if self.handled[idx] {
                    continue;
                }
                let hit = hit_moment(self.notes[idx].time, self.audio_offset);
                if now - hit > self.windows.good {
                    results.push(self.miss_event(idx, JudgmentSource::FellOff));
                } else {
                    // Later notes in this lane are not due yet.
                    break;
                }
            }
        }

        sort_chronologically(&mut results);
        results
    }

    /// Same notes as [`Self::flush_unhandled`], without marking them.
    pub fn remaining_misses(&self) -> Vec<JudgmentEvent> {
        let mut results: Vec<_> = (0..self.notes.len())
            .filter(|&idx| !self.handled[idx])
            .map(|idx| self.miss_event(idx, JudgmentSource::TrackEnd))
            .collect();
        sort_chronologically(&mut results);
        results
    }

    /// Sets the handled flag of one note. Returns `false` if it was already set or the
    /// index is out of range.
    pub fn mark_handled(&mut self, index: usize) -> bool {
        match self.handled.get_mut(index) {
            Some(flag) if !*flag => *flag = true,
            _ => return false,
        }
        self.advance_cursor(self.notes[index].lane as usize);
        true
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn notes(&self) -> &[ChartNote] {
        &self.notes
    }

    pub fn is_handled(&self, index: usize) -> bool {
        self.handled.get(index).copied().unwrap_or(false)
    }

    pub fn unhandled_count(&self) -> usize {
        self.handled.iter().filter(|h| !**h).count()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn windows(&self) -> TimingWindows {
        self.windows
    }

    pub fn per_note_score(&self) -> f64 {
        self.per_note_score
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn state(&self) -> JudgeState {
        JudgeState {
            handled: self.handled.clone(),
            chart_fingerprint: self.fingerprint,
        }
    }

    /// Checks that `state` was taken from this chart without applying it.
    pub fn check_state(&self, state: &JudgeState) -> Result<(), RestoreError> {
        if state.handled.len() != self.notes.len() {
            return Err(RestoreError::NoteCountMismatch {
                expected: self.notes.len(),
                found: state.handled.len(),
            });
        }
        if state.chart_fingerprint != self.fingerprint {
            return Err(RestoreError::ChartMismatch);
        }
        Ok(())
    }

    pub fn restore(&mut self, state: &JudgeState) -> Result<(), RestoreError> {
        self.check_state(state)?;
        self.handled.clone_from(&state.handled);
        // Cursors may need to move backwards, so recompute from scratch.
        self.cursors.iter_mut().for_each(|c| *c = 0);
        for lane in 0..self.lanes.width() {
            self.advance_cursor(lane);
        }
        Ok(())
    }

    fn points_for(&self, tier: Tier) -> u64 {
        let multiplier = match tier {
            Tier::Perfect => 1.0,
            Tier::Great => self.great_multiplier,
            Tier::Good => self.good_multiplier,
            Tier::Miss => return 0,
        };
        (self.per_note_score * multiplier).round_ties_even() as u64
    }

    fn miss_event(&self, idx: usize, source: JudgmentSource) -> JudgmentEvent {
        let note = self.notes[idx];
        JudgmentEvent {
            note_index: Some(idx),
            note_time: Some(note.time),
            ..JudgmentEvent::miss(note.lane as usize, source)
        }
    }

    fn mark_all(&mut self, events: &[JudgmentEvent]) {
        for idx in events.iter().filter_map(|e| e.note_index) {
            self.mark_handled(idx);
        }
    }

    fn advance_cursor(&mut self, lane: usize) {
        let list = self.lanes.lane(lane);
        let mut pos = self.cursors[lane];
        while pos < list.len() && self.handled[list[pos]] {
            pos += 1;
        }
        self.cursors[lane] = pos;
    }

    /// Returns (note index, signed delta). The lane list is time-ordered, so the
    /// distance to `now` shrinks and then grows; the scan stops once it grows.
    fn nearest_unhandled(&self, lane: usize, now: Seconds) -> Option<(usize, Seconds)> {
        let mut best: Option<(usize, Seconds)> = None;
        for &idx in &self.lanes.lane(lane)[self.cursors[lane]..] {
            if self.handled[idx] {
                continue;
            }
            let delta = now - hit_moment(self.notes[idx].time, self.audio_offset);
            match best {
                None => best = Some((idx, delta)),
                Some((_, best_delta)) => {
                    if delta.abs() < best_delta.abs() {
                        best = Some((idx, delta));
                    } else if delta.abs() > best_delta.abs() {
                        break;
                    }
                }
            }
        }
        best
    }
}

/// Stable identity of a note list: count, then lane and time bits of every note in
/// chart order.
pub fn chart_fingerprint(notes: &[ChartNote]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write_u64(notes.len() as u64);
    for note in notes {
        hasher.write_u8(note.lane);
        hasher.write_u64(note.time.to_bits());
    }
    hasher.finish()
}

fn sort_chronologically(events: &mut [JudgmentEvent]) {
    events.sort_by(|a, b| {
        let ta = a.note_time.unwrap_or(f64::INFINITY);
        let tb = b.note_time.unwrap_or(f64::INFINITY);
        ta.total_cmp(&tb).then(a.note_index.cmp(&b.note_index))
    });
}
