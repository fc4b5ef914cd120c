use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use signal_job::data::{write_csv, MarketScenario, SyntheticDataGenerator};

/// Write a seeded synthetic OHLCV CSV in the format `signal-job` reads.
#[derive(Parser, Debug)]
#[command(name = "generate_ohlcv")]
struct Args {
    /// Destination CSV path
    #[arg(long)]
    output: PathBuf,

    /// Number of rows to generate
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// RNG seed; the same seed always produces the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// uptrend, downtrend, sideways or volatile
    #[arg(long, default_value = "sideways")]
    scenario: MarketScenario,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("signal_job=info,generate_ohlcv=info")
        .init();

    let args = Args::parse();

    let mut generator = SyntheticDataGenerator::new(args.seed);
    let candles = generator.generate(args.scenario, args.rows);

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_csv(&args.output, &candles)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        "Wrote {} {:?} rows (seed={}) to {}",
        candles.len(),
        args.scenario,
        args.seed,
        args.output.display()
    );

    Ok(())
}
