use std::{fs, path::Path};

use anyhow::Context;
use chart_schema::{Chart, Seconds, DEFAULT_BPM};
use log::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSource {
    /// Precomputed `{"notes": [...]}` chart.
    Json,
    Simfile { difficulty: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedChart {
    pub chart: Chart,
    pub source: ChartSource,
    pub title: Option<String>,
    pub bpm: f64,
    pub offset: Seconds,
}

pub fn load_chart_from_path(
    path: impl AsRef<Path>,
    difficulty: Option<&str>,
) -> anyhow::Result<LoadedChart> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read chart: {}", path.display()))?;
    load_chart_from_str(&text, difficulty)
        .with_context(|| format!("failed to load chart: {}", path.display()))
}

/// Tries the precomputed JSON form first and falls back to `.sm` text. An unknown
/// difficulty name falls back to the first chart in the file.
pub fn load_chart_from_str(text: &str, difficulty: Option<&str>) -> anyhow::Result<LoadedChart> {
    match serde_json::from_str::<Chart>(text) {
        Ok(chart) if !chart.is_empty() => {
            info!("loaded precomputed chart with {} notes", chart.total_notes());
            return Ok(LoadedChart {
                chart,
                source: ChartSource::Json,
                title: None,
                bpm: DEFAULT_BPM,
                offset: 0.0,
            });
        }
        Ok(_) => debug!("json chart has no notes, trying simfile"),
        Err(e) => debug!("not a json chart ({e}), trying simfile"),
    }

    let simfile = sm_parser::parse_simfile(text);
    let (name, chart) = simfile
        .charts
        .select(difficulty)
        .filter(|(_, chart)| !chart.is_empty())
        .map(|(name, chart)| (name.to_string(), chart.clone()))
        .context("no valid chart data")?;

    if let Some(wanted) = difficulty {
        if wanted != name {
            info!("difficulty '{wanted}' not found, using '{name}'");
        }
    }
    info!(
        "loaded '{name}' with {} notes across {} lanes",
        chart.total_notes(),
        chart.lane_count_hint()
    );

    Ok(LoadedChart {
        chart,
        source: ChartSource::Simfile { difficulty: name },
        title: simfile.title,
        bpm: simfile.bpm,
        offset: simfile.offset,
    })
}
