use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
    #[arg(short, long)]
    difficulty: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = chart_loader::load_chart_from_path(&args.path, args.difficulty.as_deref())?;
    println!("source={:?}", loaded.source);
    println!("title={}", loaded.title.as_deref().unwrap_or("-"));
    println!("bpm={}", loaded.bpm);
    println!("offset={}", loaded.offset);
    println!("notes={}", loaded.chart.total_notes());
    Ok(())
}
