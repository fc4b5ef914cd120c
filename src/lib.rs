// Core modules
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod runner;
pub mod strategy;

// Re-export commonly used types
pub use crate::config::JobConfig;
pub use error::{ComputationError, ConfigError, DatasetError, JobError};
pub use metrics::{MetricsRecord, Status};
pub use models::*;
pub use runner::{run_job, JobPaths, JobReport, Outcome};
pub use strategy::Strategy;

// Error handling
pub type Result<T> = std::result::Result<T, JobError>;
