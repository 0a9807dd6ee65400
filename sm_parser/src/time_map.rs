use chart_schema::Seconds;

pub(crate) const BEATS_PER_MEASURE: f64 = 4.0;

/// Constant-tempo mapping from (measure, row) positions to absolute seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeMap {
    offset: Seconds,
    seconds_per_beat: f64,
}

impl TimeMap {
    /// `bpm` must already be resolved to a positive value.
    pub(crate) fn new(offset: Seconds, bpm: f64) -> Self {
        Self {
            offset,
            seconds_per_beat: 60.0 / bpm,
        }
    }

    pub(crate) fn row_time(&self, measure: usize, row: usize, row_count: usize) -> Seconds {
        let beat_in_measure = (row as f64 / row_count as f64) * BEATS_PER_MEASURE;
        let beat = measure as f64 * BEATS_PER_MEASURE + beat_in_measure;
        self.offset + beat * self.seconds_per_beat
    }
}
