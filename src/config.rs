use std::num::{NonZeroU32, NonZeroUsize};
use std::path::Path;

use config::{File, FileFormat, Map, Source, Value, ValueKind};

use crate::error::ConfigError;

/// Run configuration, loaded once and read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub seed: u32,
    pub window: NonZeroU32,
    pub version: String,
}

/// Top-level values of the YAML document, keyed by exact name and still
/// carrying their YAML type. A key with no value counts as missing.
#[derive(Debug, Default)]
struct RawJobConfig {
    seed: Option<Value>,
    window: Option<Value>,
    version: Option<Value>,
}

impl RawJobConfig {
    fn from_table(mut table: Map<String, Value>) -> Self {
        let mut take = |key: &str| {
            table
                .remove(key)
                .filter(|v| !matches!(v.kind, ValueKind::Nil))
        };
        Self {
            seed: take("seed"),
            window: take("window"),
            version: take("version"),
        }
    }
}

impl JobConfig {
    /// Load and validate a YAML config with keys `seed`, `window`, `version`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        // Collect the file source directly: merging through `Config` would
        // lowercase keys and coerce floats and bools into integers.
        let table = File::from(path)
            .format(FileFormat::Yaml)
            .required(true)
            .collect()
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        Self::from_raw(RawJobConfig::from_table(table))
    }

    fn from_raw(raw: RawJobConfig) -> Result<Self, ConfigError> {
        let seed = raw.seed.ok_or(ConfigError::MissingField("seed"))?;
        let window = raw.window.ok_or(ConfigError::MissingField("window"))?;
        let version = raw.version.ok_or(ConfigError::MissingField("version"))?;

        let seed = integer_field("seed", seed)?;
        let seed = u32::try_from(seed).map_err(|_| ConfigError::InvalidSeed(seed))?;

        let window = integer_field("window", window)?;
        let window = u32::try_from(window)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(ConfigError::InvalidWindow(window))?;

        if matches!(version.kind, ValueKind::Table(_) | ValueKind::Array(_)) {
            return Err(ConfigError::InvalidFormat(
                "version must be a scalar".to_string(),
            ));
        }
        let version = version
            .into_string()
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        Ok(Self {
            seed,
            window,
            version,
        })
    }

    /// Window size as an index-friendly width
    pub fn window_size(&self) -> NonZeroUsize {
        // u32 always fits in usize on supported targets
        NonZeroUsize::new(self.window.get() as usize).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Accept only YAML integers. Floats, bools and strings are a format error
/// rather than something to round or parse.
fn integer_field(key: &str, value: Value) -> Result<i64, ConfigError> {
    let out_of_range = || ConfigError::InvalidFormat(format!("{key} is out of range: {value}"));
    match &value.kind {
        ValueKind::I64(n) => Ok(*n),
        ValueKind::I128(n) => i64::try_from(*n).map_err(|_| out_of_range()),
        ValueKind::U64(n) => i64::try_from(*n).map_err(|_| out_of_range()),
        ValueKind::U128(n) => i64::try_from(*n).map_err(|_| out_of_range()),
        other => Err(ConfigError::InvalidFormat(format!(
            "{key} must be an integer, got {other}"
        ))),
    }
}
