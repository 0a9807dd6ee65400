use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use stepjudge_core::SessionConfig;

mod simulate;

#[derive(Debug, Parser)]
#[command(name = "stepjudge")]
#[command(about = "StepMania chart parser and judgment simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a chart to the precomputed JSON form.
    Parse {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        difficulty: Option<String>,
    },
    /// List the difficulty blocks of a `.sm` file.
    Inspect { input: PathBuf },
    /// Autoplay a chart through the judgment engine.
    Simulate {
        input: PathBuf,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Added to every press, in milliseconds. Negative is early.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        error_ms: f64,
        /// Skip every N-th note.
        #[arg(long)]
        drop_every: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            input,
            output,
            difficulty,
        } => {
            let loaded = chart_loader::load_chart_from_path(&input, difficulty.as_deref())?;
            let json =
                serde_json::to_string_pretty(&loaded.chart).context("failed to serialize chart")?;
            let out_path = output.unwrap_or_else(|| default_output_path(&input));
            fs::write(&out_path, json)
                .with_context(|| format!("failed to write: {}", out_path.display()))?;
        }
        Command::Inspect { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read: {}", input.display()))?;
            print_inspection(&text);
        }
        Command::Simulate {
            input,
            difficulty,
            config,
            error_ms,
            drop_every,
        } => {
            let loaded = chart_loader::load_chart_from_path(&input, difficulty.as_deref())?;
            let config = match config {
                Some(path) => SessionConfig::load_from(&path)?,
                None => SessionConfig::default(),
            };
            let options = simulate::SimulateOptions {
                error_ms,
                drop_every,
            };
            simulate::run_simulation(&loaded, config, &options)?;
        }
    }

    Ok(())
}

fn print_inspection(text: &str) {
    let simfile = sm_parser::parse_simfile(text);
    println!(
        "title: {}",
        simfile.title.as_deref().unwrap_or("(untitled)")
    );
    println!("bpm: {} offset: {}", simfile.bpm, simfile.offset);

    for block in sm_parser::inspect(text) {
        match block.difficulty {
            Some(name) if !block.skipped => {
                println!(
                    "block {} (line {}): {} - {} notes",
                    block.index, block.line, name, block.note_count
                );
                if let Some(meta) = simfile.meta(&name) {
                    println!(
                        "  {} @ {} bpm, offset {}",
                        meta.display_name,
                        meta.effective_bpm(),
                        meta.offset_seconds
                    );
                }
            }
            _ => println!("block {} (line {}): skipped", block.index, block.line),
        }
    }
    for diagnostic in &simfile.diagnostics {
        println!("  {diagnostic}");
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("chart.json");
    out
}
