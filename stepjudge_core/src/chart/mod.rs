use chart_schema::ChartNote;

/// Per-lane note indices into a chart's note list, each lane ordered by time and then by
/// chart order. The chart itself is not required to be sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneMap {
    lanes: Vec<Vec<usize>>,
}

impl LaneMap {
    /// `lane_count` is a minimum; lanes referenced by notes beyond it are still indexed.
    pub fn build(notes: &[ChartNote], lane_count: usize) -> Self {
        let width = notes
            .iter()
            .map(|n| n.lane as usize + 1)
            .max()
            .unwrap_or(0)
            .max(lane_count);

        let mut lanes = vec![Vec::new(); width];
        for (idx, note) in notes.iter().enumerate() {
            lanes[note.lane as usize].push(idx);
        }
        for lane in &mut lanes {
            // Stable, so equal times keep chart order.
            lane.sort_by(|&a, &b| notes[a].time.total_cmp(&notes[b].time));
        }
        Self { lanes }
    }

    pub fn lane(&self, lane: usize) -> &[usize] {
        self.lanes.get(lane).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed lanes, including lanes that only exist in the chart data.
    pub fn width(&self) -> usize {
        self.lanes.len()
    }
}
