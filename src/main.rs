use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use signal_job::logging;
use signal_job::runner::{report_failure, run_job, JobPaths};

/// Compute the rolling-mean signal rate of an OHLCV file and write a metrics record.
#[derive(Parser, Debug)]
#[command(name = "signal-job", version)]
struct Cli {
    /// Input OHLCV CSV (header row with open, high, low, close, volume)
    #[arg(long)]
    input: PathBuf,

    /// YAML config with seed, window and version
    #[arg(long)]
    config: PathBuf,

    /// Where to write the metrics JSON
    #[arg(long)]
    output: PathBuf,

    /// Log file, recreated on every run
    #[arg(long)]
    log_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = JobPaths {
        input: cli.input,
        config: cli.config,
        output: cli.output,
        log_file: cli.log_file,
    };

    let report = match logging::init(&paths.log_file) {
        Ok(()) => run_job(&paths),
        Err(e) => {
            eprintln!("{}", e);
            report_failure(&paths, &e)
        }
    };

    match report.record.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render metrics: {}", e),
    }

    ExitCode::from(report.outcome.exit_code())
}
