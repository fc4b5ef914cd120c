use std::time::Instant;

use serde::Serialize;

use crate::config::JobConfig;
use crate::error::{ComputationError, JobError};
use crate::strategy::signals::SignalSeries;

/// Name reported in the `metric` field of a success record
pub const METRIC_NAME: &str = "signal_rate";

/// Version reported when the run failed before a config was loaded
pub const FALLBACK_VERSION: &str = "v1";

/// Decimal places kept in the reported `value`
const VALUE_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Record of a completed run. Field order is the serialized order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessMetrics {
    pub version: String,
    pub rows_processed: usize,
    pub metric: String,
    pub value: f64,
    pub latency_ms: u64,
    pub seed: u32,
    pub status: Status,
}

/// Record of a failed run; carries no partial success fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorMetrics {
    pub version: String,
    pub status: Status,
    pub error_message: String,
}

impl ErrorMetrics {
    pub fn from_error(version: Option<&str>, error: &JobError) -> Self {
        Self {
            version: version.unwrap_or(FALLBACK_VERSION).to_string(),
            status: Status::Error,
            error_message: error.to_string(),
        }
    }
}

/// The single output document of a run
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MetricsRecord {
    Success(SuccessMetrics),
    Error(ErrorMetrics),
}

impl MetricsRecord {
    pub fn status(&self) -> Status {
        match self {
            MetricsRecord::Success(m) => m.status,
            MetricsRecord::Error(m) => m.status,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            MetricsRecord::Success(m) => &m.version,
            MetricsRecord::Error(m) => &m.version,
        }
    }

    /// Pretty-printed JSON, two-space indent
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Fraction of signal rows whose close was above the rolling mean.
///
/// An empty series means the dataset was shorter than the window; the mean
/// of nothing is undefined, so this is an error rather than `0.0`.
pub fn signal_rate(series: &SignalSeries) -> Result<f64, ComputationError> {
    if series.is_empty() {
        return Err(ComputationError::InsufficientRows {
            rows: series.input_rows(),
            window: series.window().get(),
        });
    }

    let total: f64 = series.points().iter().map(|p| p.signal.as_unit()).sum();
    Ok(total / series.len() as f64)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Assembles the run's metrics record and owns the latency clock.
#[derive(Debug, Clone, Copy)]
pub struct MetricsBuilder {
    started: Instant,
}

impl MetricsBuilder {
    /// Start the latency clock
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Wall-clock time since `start`, rounded to the nearest millisecond
    pub fn elapsed_ms(&self) -> u64 {
        (self.started.elapsed().as_secs_f64() * 1000.0).round() as u64
    }

    /// Reduce the series and build the success record.
    ///
    /// `rows_processed` is the number of rows the loader accepted, not the
    /// number left after warm-up.
    pub fn success(
        &self,
        config: &JobConfig,
        rows_processed: usize,
        series: &SignalSeries,
    ) -> Result<SuccessMetrics, ComputationError> {
        let rate = signal_rate(series)?;

        Ok(SuccessMetrics {
            version: config.version.clone(),
            rows_processed,
            metric: METRIC_NAME.to_string(),
            value: round_to(rate, VALUE_DECIMALS),
            latency_ms: self.elapsed_ms(),
            seed: config.seed,
            status: Status::Success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;
    use crate::models::Candle;
    use crate::strategy::generate_signals;
    use std::num::{NonZeroU32, NonZeroUsize};

    fn series(closes: &[f64], window: usize) -> SignalSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i, c, c, c, c, 1.0))
            .collect();
        generate_signals(&candles, NonZeroUsize::new(window).unwrap())
    }

    fn config() -> JobConfig {
        JobConfig {
            seed: 42,
            window: NonZeroU32::new(3).unwrap(),
            version: "v1".to_string(),
        }
    }

    #[test]
    fn test_signal_rate_all_above() {
        let rate = signal_rate(&series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3)).unwrap();
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn test_signal_rate_mixed() {
        // means at idx 1..4: 1.5, 2.5, 2.5, 3.5 -> above, above, below, above
        let rate = signal_rate(&series(&[1.0, 2.0, 3.0, 2.0, 5.0], 2)).unwrap();
        assert_eq!(rate, 0.75);
    }

    #[test]
    fn test_signal_rate_empty_is_error() {
        let err = signal_rate(&series(&[1.0, 2.0], 3)).unwrap_err();
        assert!(matches!(
            err,
            ComputationError::InsufficientRows { rows: 2, window: 3 }
        ));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 4), 0.6667);
        assert_eq!(round_to(0.12344, 4), 0.1234);
        assert_eq!(round_to(1.0, 4), 1.0);
    }

    #[test]
    fn test_success_record_fields() {
        let builder = MetricsBuilder::start();
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        let metrics = builder.success(&config(), 5, &s).unwrap();

        assert_eq!(metrics.rows_processed, 5);
        assert_eq!(metrics.metric, "signal_rate");
        assert_eq!(metrics.value, 1.0);
        assert_eq!(metrics.seed, 42);
        assert_eq!(metrics.version, "v1");
        assert_eq!(metrics.status, Status::Success);
    }

    #[test]
    fn test_success_json_field_order() {
        let record = MetricsRecord::Success(SuccessMetrics {
            version: "v1".to_string(),
            rows_processed: 10,
            metric: METRIC_NAME.to_string(),
            value: 0.5,
            latency_ms: 3,
            seed: 42,
            status: Status::Success,
        });

        let json = record.to_json().unwrap();
        let keys: Vec<usize> = [
            "\"version\"",
            "\"rows_processed\"",
            "\"metric\"",
            "\"value\"",
            "\"latency_ms\"",
            "\"seed\"",
            "\"status\"",
        ]
        .iter()
        .map(|k| json.find(k).unwrap())
        .collect();

        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"status\": \"success\""));
        assert!(!json.contains("error_message"));
    }

    #[test]
    fn test_error_record_has_no_success_fields() {
        let err = JobError::from(DatasetError::MissingColumn("volume"));
        let record = MetricsRecord::Error(ErrorMetrics::from_error(Some("v2"), &err));

        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(value["version"], "v2");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_message"], "Missing required column: volume");
        assert_eq!(record.status(), Status::Error);
    }

    #[test]
    fn test_error_record_falls_back_to_default_version() {
        let err = JobError::from(DatasetError::Empty);
        let metrics = ErrorMetrics::from_error(None, &err);

        assert_eq!(metrics.version, FALLBACK_VERSION);
        assert_eq!(metrics.error_message, "CSV file is empty");
    }
}
