use std::path::PathBuf;
use thiserror::Error;

/// Malformed or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Missing config field: {0}")]
    MissingField(&'static str),

    #[error("Invalid window: {0} (must be a positive integer)")]
    InvalidWindow(i64),

    #[error("Invalid seed: {0} (must be an unsigned 32-bit integer)")]
    InvalidSeed(i64),
}

/// Input table could not be turned into validated rows.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid CSV format: {0}")]
    InvalidFormat(String),

    #[error("CSV file is empty")]
    Empty,

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid value '{raw}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        raw: String,
    },
}

/// The signal could not be reduced to a rate.
#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("Insufficient rows for configured window: {rows} rows, window {window}")]
    InsufficientRows { rows: usize, window: usize },
}

/// Any failure that ends a run with an error record.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("Failed to write metrics to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file {}: {reason}", .path.display())]
    Log { path: PathBuf, reason: String },
}

impl JobError {
    /// Short classification used in the execution log.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Config(_) => "config",
            JobError::Dataset(_) => "dataset",
            JobError::Computation(_) => "computation",
            JobError::Output { .. } => "output",
            JobError::Log { .. } => "log",
        }
    }
}
