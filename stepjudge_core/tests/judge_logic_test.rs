#[cfg(test)]
mod tests {
    use chart_schema::{Chart, ChartNote};
    use stepjudge_core::gameplay::judge::{JudgeEngine, JudgeState};
    use stepjudge_core::{JudgeError, JudgmentSource, RestoreError, SessionConfig, Tier};

    fn config() -> SessionConfig {
        SessionConfig {
            perfect_window: 0.05,
            great_window: 0.10,
            good_window: 0.20,
            ..SessionConfig::default()
        }
    }

    fn create_test_chart() -> Chart {
        // Note 0: Time 1.0, Lane 1
        // Note 1: Time 1.5, Lane 2
        // Note 2: Time 2.0, Lane 1
        Chart::new(vec![
            ChartNote { time: 1.0, lane: 1 },
            ChartNote { time: 1.5, lane: 2 },
            ChartNote { time: 2.0, lane: 1 },
        ])
    }

    fn engine(chart: &Chart, config: &SessionConfig) -> JudgeEngine {
        JudgeEngine::new(chart, config).expect("chart has notes")
    }

    #[test]
    fn test_perfect_judgment() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(1, 1.0).unwrap().expect("Should trigger judgment");

        assert_eq!(result.tier, Tier::Perfect);
        assert_eq!(result.note_index, Some(0));
        assert_eq!(result.note_time, Some(1.0));
        assert_eq!(result.delta, Some(0.0));
        assert_eq!(result.points, 333_333);
        assert_eq!(result.source, JudgmentSource::Press);
        assert!(judge.is_handled(0));
    }

    #[test]
    fn test_late_good_judgment() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        // +0.15 is past great (0.10) but inside good (0.20).
        let result = judge.try_hit(1, 1.15).unwrap().unwrap();
        assert_eq!(result.tier, Tier::Good);
        assert_eq!(result.note_index, Some(0));
        assert_eq!(result.points, 100_000);
        assert!(result.delta.unwrap() > 0.0);
    }

    #[test]
    fn test_early_great_judgment() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(1, 0.93).unwrap().unwrap();
        assert_eq!(result.tier, Tier::Great);
        assert_eq!(result.points, 233_333);
        assert!(result.delta.unwrap() < 0.0);
    }

    #[test]
    fn test_press_outside_good_window_consumes_note_as_miss() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(1, 0.5).unwrap().unwrap();
        assert_eq!(result.tier, Tier::Miss);
        assert_eq!(result.points, 0);
        assert_eq!(result.note_index, Some(0));
        assert_eq!(result.source, JudgmentSource::Press);
        assert!(judge.is_handled(0));

        // The next press on the lane goes to the following note.
        let result = judge.try_hit(1, 2.0).unwrap().unwrap();
        assert_eq!(result.note_index, Some(2));
        assert_eq!(result.tier, Tier::Perfect);
    }

    #[test]
    fn test_empty_lane_press_is_a_miss_by_default() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(3, 1.0).unwrap().unwrap();
        assert_eq!(result.tier, Tier::Miss);
        assert_eq!(result.source, JudgmentSource::EmptyLane);
        assert_eq!(result.note_index, None);
        assert_eq!(judge.unhandled_count(), 3);
    }

    #[test]
    fn test_empty_lane_press_can_be_ignored() {
        let chart = create_test_chart();
        let config = SessionConfig {
            miss_on_empty_lane: false,
            ..config()
        };
        let mut judge = engine(&chart, &config);

        assert_eq!(judge.try_hit(0, 1.0).unwrap(), None);
    }

    #[test]
    fn test_invalid_lane_is_rejected() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        assert_eq!(
            judge.try_hit(4, 1.0),
            Err(JudgeError::InvalidLane {
                lane: 4,
                lane_count: 4
            })
        );
        assert_eq!(judge.unhandled_count(), 3);
    }

    #[test]
    fn test_nearest_note_wins() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        // Closer to note 2 (2.0) than note 0 (1.0).
        let result = judge.try_hit(1, 1.95).unwrap().unwrap();
        assert_eq!(result.note_index, Some(2));
        assert!(result.tier.is_hit());
        assert!(!judge.is_handled(0));
    }

    #[test]
    fn test_equal_distance_prefers_earlier_note() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(1, 1.5).unwrap().unwrap();
        assert_eq!(result.note_index, Some(0));
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let chart = Chart::new(vec![ChartNote { time: 0.0, lane: 0 }]);
        let config = config();
        let cases = [
            (0.05, Tier::Perfect),
            (0.05 + 1e-9, Tier::Great),
            (0.10, Tier::Great),
            (0.10 + 1e-9, Tier::Good),
            (0.20, Tier::Good),
            (0.20 + 1e-9, Tier::Miss),
            (-0.05, Tier::Perfect),
        ];
        for (now, expected) in cases {
            let mut judge = engine(&chart, &config);
            let result = judge.try_hit(0, now).unwrap().unwrap();
            assert_eq!(result.tier, expected, "now={now}");
        }
    }

    #[test]
    fn test_audio_offset_shifts_hit_moment() {
        let chart = create_test_chart();
        let config = SessionConfig {
            audio_offset: 0.1,
            ..config()
        };
        let mut judge = engine(&chart, &config);

        let result = judge.try_hit(1, 0.9).unwrap().unwrap();
        assert_eq!(result.tier, Tier::Perfect);
        assert_eq!(result.note_time, Some(1.0));
    }

    #[test]
    fn test_unsorted_chart_is_tolerated() {
        let chart = Chart::new(vec![
            ChartNote { time: 2.0, lane: 0 },
            ChartNote { time: 1.0, lane: 0 },
        ]);
        let mut judge = engine(&chart, &config());

        let first = judge.try_hit(0, 1.0).unwrap().unwrap();
        assert_eq!(first.note_index, Some(1));
        let second = judge.try_hit(0, 2.0).unwrap().unwrap();
        assert_eq!(second.note_index, Some(0));
    }

    #[test]
    fn test_repeated_press_consumes_notes_in_turn() {
        let chart = Chart::new(vec![
            ChartNote { time: 1.0, lane: 0 },
            ChartNote { time: 1.1, lane: 0 },
        ]);
        let mut judge = engine(&chart, &config());

        let a = judge.try_hit(0, 1.0).unwrap().unwrap();
        let b = judge.try_hit(0, 1.0).unwrap().unwrap();
        assert_eq!(a.note_index, Some(0));
        assert_eq!(b.note_index, Some(1));
        assert_eq!(judge.unhandled_count(), 0);
    }

    #[test]
    fn test_sweep_misses() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        assert!(judge.sweep_misses(1.0).is_empty());
        // Note 0 (1.0) + good (0.2) = 1.2. Not missed yet.
        assert!(judge.sweep_misses(1.15).is_empty());

        let misses = judge.sweep_misses(1.21);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].tier, Tier::Miss);
        assert_eq!(misses[0].source, JudgmentSource::FellOff);
        assert_eq!(misses[0].note_index, Some(0));
        assert_eq!(misses[0].lane, 1);

        // Already handled, not reported again.
        assert!(judge.sweep_misses(1.22).is_empty());

        let misses = judge.sweep_misses(2.21);
        let indices: Vec<_> = misses.iter().map(|m| m.note_index).collect();
        assert_eq!(indices, vec![Some(1), Some(2)]);
        assert_eq!(judge.unhandled_count(), 0);
    }

    #[test]
    fn test_hit_notes_are_never_swept() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        judge.try_hit(1, 1.0).unwrap();
        let misses = judge.sweep_misses(10.0);
        assert!(misses.iter().all(|m| m.note_index != Some(0)));
        assert_eq!(misses.len(), 2);
    }

    #[test]
    fn test_lane_independence_out_of_order_input() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let result = judge.try_hit(2, 1.5).unwrap().expect("Hit Lane 2");
        assert_eq!(result.note_index, Some(1));

        let result = judge.try_hit(1, 1.0).unwrap().expect("Hit Lane 1");
        assert_eq!(result.note_index, Some(0));

        assert!(judge.sweep_misses(1.6).is_empty());
    }

    #[test]
    fn test_flush_unhandled_misses_everything_left() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        judge.try_hit(2, 1.5).unwrap();
        let flushed = judge.flush_unhandled();
        assert_eq!(flushed.len(), 2);
        assert!(flushed.iter().all(|e| e.source == JudgmentSource::TrackEnd));
        assert_eq!(judge.unhandled_count(), 0);
        assert!(judge.flush_unhandled().is_empty());
    }

    #[test]
    fn test_points_round_half_to_even() {
        let two_notes = Chart::new(vec![
            ChartNote { time: 0.0, lane: 0 },
            ChartNote { time: 1.0, lane: 0 },
        ]);
        for (target, expected) in [(5, 2), (3, 2), (7, 4)] {
            let config = SessionConfig {
                target_score: target,
                ..config()
            };
            let mut judge = engine(&two_notes, &config);
            let result = judge.try_hit(0, 0.0).unwrap().unwrap();
            assert_eq!(result.points, expected, "target={target}");
        }
    }

    #[test]
    fn test_empty_chart_has_no_engine() {
        assert!(JudgeEngine::new(&Chart::default(), &config()).is_none());
    }

    #[test]
    fn test_restore_state() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let saved = judge.state();
        judge.try_hit(1, 1.0).unwrap();
        judge.try_hit(1, 2.0).unwrap();
        assert_eq!(judge.unhandled_count(), 1);

        judge.restore(&saved).unwrap();
        assert_eq!(judge.unhandled_count(), 3);
        let result = judge.try_hit(1, 1.0).unwrap().unwrap();
        assert_eq!(result.note_index, Some(0));

        let err = judge
            .restore(&JudgeState {
                handled: vec![false; 2],
                chart_fingerprint: saved.chart_fingerprint,
            })
            .unwrap_err();
        assert_eq!(
            err,
            RestoreError::NoteCountMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_restore_rejects_other_chart_with_same_note_count() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());
        let other = Chart::new(vec![
            ChartNote { time: 1.0, lane: 1 },
            ChartNote { time: 1.5, lane: 2 },
            ChartNote { time: 2.5, lane: 1 },
        ]);
        let foreign = engine(&other, &config()).state();

        assert_eq!(judge.restore(&foreign), Err(RestoreError::ChartMismatch));
        assert_eq!(judge.unhandled_count(), 3);
        assert_ne!(judge.fingerprint(), engine(&other, &config()).fingerprint());
        assert_eq!(judge.fingerprint(), engine(&chart, &config()).fingerprint());
    }

    #[test]
    fn test_due_misses_does_not_mark_notes() {
        let chart = create_test_chart();
        let mut judge = engine(&chart, &config());

        let due = judge.due_misses(2.21);
        assert_eq!(due.len(), 3);
        assert_eq!(judge.unhandled_count(), 3);

        assert!(judge.mark_handled(0));
        assert!(!judge.mark_handled(0));
        assert!(!judge.mark_handled(99));
        let due = judge.due_misses(2.21);
        let indices: Vec<_> = due.iter().map(|m| m.note_index).collect();
        assert_eq!(indices, vec![Some(1), Some(2)]);

        assert_eq!(judge.remaining_misses().len(), 2);
        assert!(judge
            .remaining_misses()
            .iter()
            .all(|m| m.source == JudgmentSource::TrackEnd));
    }
}
