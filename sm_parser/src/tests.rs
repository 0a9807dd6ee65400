use super::*;
use chart_schema::ChartNote;
use std::fs;

fn block(name: &str, body: &str) -> String {
    format!("#NOTES:\n     dance-single:\n     {name}:\n     Author:\n     5:\n{body}\n;\n")
}

fn simfile(header: &str, blocks: &[String]) -> String {
    let mut s = header.to_string();
    for b in blocks {
        s.push_str(b);
    }
    s
}

#[test]
fn single_tap_on_first_row_lands_at_zero() {
    let src = simfile(
        "#BPMS:0=120;\n#OFFSET:0;\n",
        &[block("Hard", "1000\n0000\n0000\n0000")],
    );

    let charts = parse_all(&src);
    assert_eq!(charts.len(), 1);
    let chart = charts.get("Hard").unwrap();
    assert_eq!(chart.notes, vec![ChartNote { time: 0.0, lane: 0 }]);
}

#[test]
fn rows_and_measures_map_to_beats() {
    let src = simfile(
        "#BPMS:0.000=120.000;\n#OFFSET:0.000;\n",
        &[block("Medium", "1000\n0100\n0010\n0001\n,\n1100\n0000")],
    );

    let chart = parse_all(&src).get("Medium").cloned().unwrap();
    let pairs: Vec<(u8, f64)> = chart.notes.iter().map(|n| (n.lane, n.time)).collect();
    assert_eq!(
        pairs,
        vec![(0, 0.0), (1, 0.5), (2, 1.0), (3, 1.5), (0, 2.0), (1, 2.0)]
    );
}

#[test]
fn offset_and_tempo_shift_times() {
    let src = simfile(
        "#OFFSET:-0.5;\n#BPMS:0=60;\n",
        &[block("Easy", "0000\n0001\n,\n0000\n1000")],
    );

    let sim = parse_simfile(&src);
    assert_eq!(sim.bpm, 60.0);
    assert_eq!(sim.offset, -0.5);
    let chart = sim.chart("Easy").unwrap();
    assert_eq!(chart.notes[0], ChartNote { time: 1.5, lane: 3 });
    assert_eq!(chart.notes[1], ChartNote { time: 5.5, lane: 0 });
}

#[test]
fn only_tap_cells_produce_notes() {
    let src = simfile(
        "#BPMS:0=120;\n",
        &[block("Hard", "2000\n3000\nM000\n1000")],
    );

    let chart = parse_all(&src).get("Hard").cloned().unwrap();
    assert_eq!(chart.notes, vec![ChartNote { time: 1.5, lane: 0 }]);
}

#[test]
fn short_rows_are_skipped_but_still_occupy_a_row() {
    let src = simfile("#BPMS:0=120;\n", &[block("Hard", "10\n1000")]);

    let chart = parse_all(&src).get("Hard").cloned().unwrap();
    assert_eq!(chart.notes, vec![ChartNote { time: 1.0, lane: 0 }]);
}

#[test]
fn measure_comments_do_not_count_as_rows() {
    let src = simfile(
        "#BPMS:0=120;\n",
        &[block("Hard", "1000\n0000\n,  // measure 2\n0100\n0000")],
    );

    let chart = parse_all(&src).get("Hard").cloned().unwrap();
    assert_eq!(
        chart.notes,
        vec![
            ChartNote { time: 0.0, lane: 0 },
            ChartNote { time: 2.0, lane: 1 },
        ]
    );
}

#[test]
fn body_stops_at_semicolon_line() {
    let src = "#BPMS:0=120;\n#NOTES:\n  dance-single:\n  Hard:\n  a:\n  1:\n1000\n;\n0001\n";

    let chart = parse_all(src).get("Hard").cloned().unwrap();
    assert_eq!(chart.total_notes(), 1);
    assert_eq!(chart.notes[0].lane, 0);
}

#[test]
fn short_block_is_skipped_and_later_blocks_survive() {
    let src = simfile(
        "#BPMS:0=120;\n",
        &["#NOTES:\nfoo:\nbar:\n".to_string(), block("Challenge", "0010")],
    );

    let sim = parse_simfile(&src);
    assert_eq!(sim.charts.len(), 1);
    assert!(sim.chart("Challenge").is_some());

    let skipped: Vec<_> = sim.diagnostics.iter().filter(|d| d.code == "E1002").collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].block, Some(1));
    assert_eq!(skipped[0].line, Some(2));
    assert_eq!(skipped[0].kind, ParseErrorKind::Block);
    assert!(skipped[0].is_recoverable());
}

#[test]
fn text_without_notes_yields_empty_set() {
    let sim = parse_simfile("#TITLE:Nothing;\n#BPMS:0=120;\n");
    assert!(sim.charts.is_empty());
    assert_eq!(sim.diagnostics.len(), 1);
    assert_eq!(sim.diagnostics[0].code, "E1001");
    assert_eq!(sim.title.as_deref(), Some("Nothing"));
}

#[test]
fn missing_bpm_defaults_to_120() {
    let src = simfile("", &[block("Hard", "0000\n1000")]);

    let sim = parse_simfile(&src);
    assert_eq!(sim.bpm, 120.0);
    assert_eq!(sim.chart("Hard").unwrap().notes[0].time, 1.0);
    assert!(sim.diagnostics.iter().any(|d| d.code == "W3001"));
}

#[test]
fn multiple_difficulties_keep_source_order() {
    let src = simfile(
        "#BPMS:0=120;\n",
        &[
            block("Beginner", "1000"),
            block("Hard", "0100"),
            block("Beginner", "0010\n0001"),
        ],
    );

    let charts = parse_all(&src);
    assert_eq!(charts.names().collect::<Vec<_>>(), vec!["Beginner", "Hard"]);
    assert_eq!(charts.get("Beginner").unwrap().total_notes(), 2);
}

#[test]
fn carriage_returns_are_ignored() {
    let unix = simfile("#BPMS:0=120;\n", &[block("Hard", "1000\n0100\n0010\n0001")]);
    let dos = unix.replace('\n', "\r\n");

    assert_eq!(parse_all(&unix), parse_all(&dos));
}

#[test]
fn parsing_is_deterministic() {
    let src = simfile(
        "#OFFSET:0.031;\n#BPMS:0=174;\n",
        &[block("Expert", "1001\n0110\n1111\n0000\n,\n1000\n0100\n0010\n0001\n0000\n0000\n0000\n0000")],
    );

    let a = parse_all(&src);
    let b = parse_all(&src);
    assert_eq!(a, b);
    assert_eq!(a.get("Expert").unwrap().total_notes(), 12);
}

#[test]
fn inspect_lists_every_block() {
    let src = simfile(
        "#BPMS:0=120;\n",
        &[block("Easy", "1000\n0100"), "#NOTES:\nx\n".to_string()],
    );

    let summaries = inspect(&src);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].difficulty.as_deref(), Some("Easy"));
    assert_eq!(summaries[0].note_count, 2);
    assert!(!summaries[0].skipped);
    assert_eq!(summaries[1].index, 2);
    assert!(summaries[1].skipped);
}

#[test]
fn parse_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.sm");
    fs::write(
        &path,
        simfile("#TITLE:Disk;\n#BPMS:0=120;\n", &[block("Hard", "1000")]),
    )
    .unwrap();

    let sim = parse_file(&path).unwrap();
    assert_eq!(sim.title.as_deref(), Some("Disk"));
    assert_eq!(sim.chart("Hard").unwrap().total_notes(), 1);
}

#[test]
fn parse_file_missing_is_e2001() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sm");

    let err = parse_file(&path).unwrap_err();
    assert_eq!(err.code, "E2001");
    assert_eq!(err.kind, ParseErrorKind::Io);
    assert!(!err.is_recoverable());
    assert!(err.file.as_deref().unwrap().ends_with("missing.sm"));
    assert!(err.to_string().starts_with("E2001: failed to read simfile:"));
}

#[test]
fn meta_carries_file_timing() {
    let src = simfile("#OFFSET:0.25;\n#BPMS:0=-5;\n", &[block("Beginner", "1000")]);

    let sim = parse_simfile(&src);
    let meta = sim.meta("Beginner").unwrap();
    assert_eq!(meta.display_name, "Beginner");
    assert_eq!(meta.effective_bpm(), 120.0);
    assert_eq!(meta.offset_seconds, 0.25);
    assert!(sim.meta("Expert").is_none());
}
