use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::JobError;
use crate::Result;

const DEFAULT_FILTER: &str = "signal_job=info";

/// Route all tracing output to a fresh log file for this invocation.
///
/// The file is truncated on open and written without buffering, so the log
/// is complete even if the run ends in an error. `RUST_LOG` overrides the
/// default filter.
pub fn init(log_file: &Path) -> Result<()> {
    let log_error = |reason: String| JobError::Log {
        path: log_file.to_path_buf(),
        reason,
    };

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| log_error(e.to_string()))?;
    }
    let file = File::create(log_file).map_err(|e| log_error(e.to_string()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| log_error(e.to_string()))
}
