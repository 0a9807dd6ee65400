use anyhow::Context;
use chart_loader::{ChartSource, LoadedChart};
use chart_schema::Seconds;
use log::debug;
use stepjudge_core::input::events::KeyDown;
use stepjudge_core::time::ManualClock;
use stepjudge_core::timing::hit_moment;
use stepjudge_core::{
    ClockSource, FinishReason, JudgmentEvent, JudgmentSink, Phase, ScoreSnapshot, Session,
    SessionConfig,
};

const FRAME: Seconds = 1.0 / 60.0;

pub struct SimulateOptions {
    pub error_ms: f64,
    pub drop_every: Option<usize>,
}

struct PrintSink;

impl JudgmentSink for PrintSink {
    fn on_judgment(&mut self, event: &JudgmentEvent) {
        let time = event
            .note_time
            .map(|t| format!("{t:8.3}"))
            .unwrap_or_else(|| "       -".to_string());
        let delta = event
            .delta
            .map(|d| format!("{:+7.1} ms", d * 1000.0))
            .unwrap_or_default();
        println!(
            "{time} | {} | {:<7} | {:>7} | {delta}",
            event.lane,
            event.tier.label(),
            event.points
        );
    }

    fn on_finished(&mut self, reason: FinishReason) {
        println!("--------|---|---------|---------|");
        println!("finished: {reason:?}");
    }
}

pub fn run_simulation(
    loaded: &LoadedChart,
    config: SessionConfig,
    options: &SimulateOptions,
) -> anyhow::Result<ScoreSnapshot> {
    let good_window = config.good_window;
    let presses = planned_presses(loaded, &config, options);
    let mut session = Session::new(&loaded.chart, config)
        .context("failed to start session")?
        .with_bpm(loaded.bpm);

    match &loaded.source {
        ChartSource::Simfile { difficulty } => println!(
            "Simulating '{}' [{difficulty}] ({} notes)",
            loaded.title.as_deref().unwrap_or("(untitled)"),
            loaded.chart.total_notes()
        ),
        ChartSource::Json => println!("Simulating chart ({} notes)", loaded.chart.total_notes()),
    }
    println!("    Time | L | Tier    |  Points | Delta");
    println!("--------|---|---------|---------|");

    let last_press = presses.last().map(|p| p.0).unwrap_or(0.0);
    let last_note = loaded.chart.last_note_time().unwrap_or(0.0);
    let end = last_press.max(last_note) + good_window + FRAME;

    let mut clock = ManualClock::new();
    let mut sink = PrintSink;
    let mut next = 0;
    let mut input = Vec::new();

    while clock.now() <= end {
        let now = clock.now();
        while next < presses.len() && presses[next].0 <= now {
            input.push(presses[next].1);
            next += 1;
        }
        if let Phase::Finished(_) = session.tick(&clock, &mut input, &mut sink) {
            break;
        }
        clock.advance(FRAME);
    }

    if !session.is_finished() {
        clock.stop();
        session.tick(&clock, &mut Vec::<KeyDown>::new(), &mut sink);
    }

    let snapshot = session.snapshot();
    print_summary(&snapshot);
    Ok(snapshot)
}

/// Press time and lane for every note that is not dropped, in press order.
fn planned_presses(
    loaded: &LoadedChart,
    config: &SessionConfig,
    options: &SimulateOptions,
) -> Vec<(Seconds, KeyDown)> {
    let error = options.error_ms / 1000.0;
    let mut presses: Vec<(Seconds, KeyDown)> = loaded
        .chart
        .notes
        .iter()
        .enumerate()
        .filter(|(i, _)| match options.drop_every {
            Some(n) if n > 0 => (i + 1) % n != 0,
            _ => true,
        })
        .map(|(_, note)| {
            (
                hit_moment(note.time, config.audio_offset) + error,
                KeyDown {
                    lane: note.lane as usize,
                },
            )
        })
        .collect();
    presses.sort_by(|a, b| a.0.total_cmp(&b.0));
    debug!(
        "planned {} of {} presses",
        presses.len(),
        loaded.chart.total_notes()
    );
    presses
}

fn print_summary(snapshot: &ScoreSnapshot) {
    println!("score: {}", snapshot.score);
    println!("accuracy: {:.2}%", snapshot.accuracy);
    println!(
        "combo: {} max combo: {}",
        snapshot.combo, snapshot.max_combo
    );
    println!(
        "perfect: {} great: {} good: {} miss: {}",
        snapshot.perfect, snapshot.great, snapshot.good, snapshot.miss
    );
    println!("life: {:.2}", snapshot.life);
}
