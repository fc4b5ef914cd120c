use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::JobConfig;
use crate::data::load_candles;
use crate::error::JobError;
use crate::metrics::{ErrorMetrics, MetricsBuilder, MetricsRecord, SuccessMetrics};
use crate::strategy::{RollingMeanStrategy, Strategy};

/// The four locations a run reads from and writes to
#[derive(Debug, Clone)]
pub struct JobPaths {
    pub input: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub log_file: PathBuf,
}

/// Last pipeline stage a run reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    DatasetLoaded,
    SignalComputed,
    MetricsAssembled,
    Written,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    /// Process exit code: 0 iff the run succeeded
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Error => 1,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct JobReport {
    pub record: MetricsRecord,
    pub outcome: Outcome,
    pub stage: Stage,
}

/// Run the pipeline once: config, dataset, signals, metrics, output.
///
/// Never panics on bad input. The first failure short-circuits the
/// remaining stages and is turned into an error record; there are no retries.
pub fn run_job(paths: &JobPaths) -> JobReport {
    let mut run = JobRun::new(paths);
    tracing::info!("Job started");

    let record = match run.compute() {
        Ok(metrics) => MetricsRecord::Success(metrics),
        Err(e) => run.failure_record(&e),
    };

    run.finish(record)
}

/// Write an error record for a failure that happened before the pipeline
/// could start, e.g. the log file could not be opened.
pub fn report_failure(paths: &JobPaths, error: &JobError) -> JobReport {
    let run = JobRun::new(paths);
    let record = run.failure_record(error);
    run.finish(record)
}

struct JobRun<'a> {
    paths: &'a JobPaths,
    metrics: MetricsBuilder,
    stage: Stage,
    version: Option<String>,
}

impl<'a> JobRun<'a> {
    fn new(paths: &'a JobPaths) -> Self {
        Self {
            paths,
            metrics: MetricsBuilder::start(),
            stage: Stage::Start,
            version: None,
        }
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
    }

    fn compute(&mut self) -> Result<SuccessMetrics, JobError> {
        let config = JobConfig::load(&self.paths.config)?;
        self.version = Some(config.version.clone());
        tracing::info!(
            "Config loaded: seed={}, window={}, version={}",
            config.seed,
            config.window,
            config.version
        );
        self.advance(Stage::ConfigLoaded);

        let candles = load_candles(&self.paths.input)?;
        tracing::info!("Data loaded: {} rows", candles.len());
        self.advance(Stage::DatasetLoaded);

        let strategy = RollingMeanStrategy::new(config.window_size());
        tracing::info!(
            "Running {} strategy, first signal at row {}",
            strategy.name(),
            strategy.min_candles_required()
        );
        let series = strategy.generate_signals(&candles);
        tracing::info!("Signals generated");
        self.advance(Stage::SignalComputed);

        let metrics = self.metrics.success(&config, candles.len(), &series)?;
        self.advance(Stage::MetricsAssembled);

        Ok(metrics)
    }

    fn failure_record(&self, error: &JobError) -> MetricsRecord {
        tracing::error!(kind = error.kind(), stage = ?self.stage, "{}", error);
        MetricsRecord::Error(ErrorMetrics::from_error(self.version.as_deref(), error))
    }

    fn finish(mut self, record: MetricsRecord) -> JobReport {
        if let Err(e) = write_record(&self.paths.output, &record) {
            tracing::error!(kind = e.kind(), "{}", e);
            let record = MetricsRecord::Error(ErrorMetrics::from_error(Some(record.version()), &e));
            return JobReport {
                record,
                outcome: Outcome::Error,
                stage: self.stage,
            };
        }
        self.advance(Stage::Written);

        let outcome = match &record {
            MetricsRecord::Success(m) => {
                tracing::info!(
                    "Metrics: signal_rate={}, rows_processed={}",
                    m.value,
                    m.rows_processed
                );
                tracing::info!("Job completed successfully in {}ms", m.latency_ms);
                Outcome::Success
            }
            MetricsRecord::Error(_) => {
                tracing::info!("Error metrics written to {}", self.paths.output.display());
                Outcome::Error
            }
        };

        JobReport {
            record,
            outcome,
            stage: self.stage,
        }
    }
}

/// Write the record as the sole content of `path`, creating parent dirs.
fn write_record(path: &Path, record: &MetricsRecord) -> Result<(), JobError> {
    let output_error = |source: io::Error| JobError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }

    let mut json = record
        .to_json()
        .map_err(|e| output_error(io::Error::from(e)))?;
    json.push('\n');

    fs::write(path, json).map_err(output_error)
}
