use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::models::Candle;

/// First synthetic timestamp (2024-01-01T00:00:00Z), fixed so fixtures are reproducible.
const SYNTHETIC_EPOCH_SECS: i64 = 1_704_067_200;

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketScenario {
    /// Steady uptrend with noise (+2% daily average)
    Uptrend,
    /// Steady downtrend with noise (-2% daily average)
    Downtrend,
    /// Sideways/choppy market (±1% around mean)
    Sideways,
    /// High volatility (±5% large swings)
    Volatile,
}

impl FromStr for MarketScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uptrend" => Ok(MarketScenario::Uptrend),
            "downtrend" => Ok(MarketScenario::Downtrend),
            "sideways" => Ok(MarketScenario::Sideways),
            "volatile" => Ok(MarketScenario::Volatile),
            other => Err(format!(
                "unknown scenario '{}' (expected uptrend, downtrend, sideways or volatile)",
                other
            )),
        }
    }
}

/// Generates seeded OHLCV fixtures in the input format the job reads
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
        }
    }

    /// Generate `num_candles` candles for a market scenario
    pub fn generate(&mut self, scenario: MarketScenario, num_candles: usize) -> Vec<Candle> {
        let mut candles = Vec::with_capacity(num_candles);
        let mut current_price = self.base_price;
        let mean_price = self.base_price;

        // +/-2% per day at 5 minute bars
        let drift_per_bar = 0.02 / (24.0 * 60.0 / 5.0);

        for index in 0..num_candles {
            match scenario {
                MarketScenario::Uptrend => {
                    let noise = current_price * self.rng.gen_range(-0.001..0.001);
                    current_price += current_price * drift_per_bar + noise;
                }
                MarketScenario::Downtrend => {
                    let noise = current_price * self.rng.gen_range(-0.001..0.001);
                    current_price -= current_price * drift_per_bar - noise;
                }
                MarketScenario::Sideways => {
                    let reversion = (mean_price - current_price) * 0.1;
                    let noise = current_price * self.rng.gen_range(-0.01..0.01);
                    current_price += reversion + noise;
                }
                MarketScenario::Volatile => {
                    current_price += current_price * self.rng.gen_range(-0.05..0.05);
                    current_price = current_price.max(self.base_price * 0.5);
                }
            }

            candles.push(self.create_candle(index, current_price));
        }

        candles
    }

    /// Helper to create a candle around a close price
    fn create_candle(&mut self, index: usize, price: f64) -> Candle {
        let noise_pct = 0.002; // ±0.2% intrabar movement

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));

        let open_raw = price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let open = open_raw.clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle::new(index, open, high, low, price, volume)
    }
}

#[derive(Debug, Serialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Timestamp of the bar at `index`, 5 minutes apart from a fixed start
pub fn bar_timestamp(index: usize) -> DateTime<Utc> {
    let start = Utc
        .timestamp_opt(SYNTHETIC_EPOCH_SECS, 0)
        .single()
        .unwrap_or_default();
    start + Duration::minutes(index as i64 * 5)
}

/// Write candles as `timestamp,open,high,low,close,volume`
pub fn write_csv(path: &Path, candles: &[Candle]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;

    for candle in candles {
        writer.serialize(CsvRow {
            timestamp: bar_timestamp(candle.index).to_rfc3339(),
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_candles;

    #[test]
    fn test_generate_uptrend() {
        let mut gen = SyntheticDataGenerator::new(42);
        let candles = gen.generate(MarketScenario::Uptrend, 500);

        assert_eq!(candles.len(), 500);

        let first_price = candles.first().unwrap().close;
        let last_price = candles.last().unwrap().close;

        assert!(
            last_price > first_price,
            "Uptrend should end higher: {} -> {}",
            first_price,
            last_price
        );
    }

    #[test]
    fn test_generate_downtrend() {
        let mut gen = SyntheticDataGenerator::new(42);
        let candles = gen.generate(MarketScenario::Downtrend, 500);

        let first_price = candles.first().unwrap().close;
        let last_price = candles.last().unwrap().close;

        assert!(
            last_price < first_price,
            "Downtrend should end lower: {} -> {}",
            first_price,
            last_price
        );
    }

    #[test]
    fn test_generate_sideways() {
        let mut gen = SyntheticDataGenerator::new(42);
        let candles = gen.generate(MarketScenario::Sideways, 500);

        // Should stay roughly around base price (±10%)
        let base = gen.base_price;
        for candle in &candles {
            assert!(
                candle.close > base * 0.9 && candle.close < base * 1.1,
                "Sideways should stay near base: {} vs {}",
                candle.close,
                base
            );
        }
    }

    #[test]
    fn test_same_seed_same_candles() {
        let a = SyntheticDataGenerator::new(7).generate(MarketScenario::Volatile, 200);
        let b = SyntheticDataGenerator::new(7).generate(MarketScenario::Volatile, 200);

        assert_eq!(a, b);
    }

    #[test]
    fn test_ohlc_consistency() {
        let mut gen = SyntheticDataGenerator::new(42);
        let candles = gen.generate(MarketScenario::Uptrend, 100);

        for candle in &candles {
            assert!(candle.high >= candle.close, "High should be >= close");
            assert!(candle.high >= candle.open, "High should be >= open");
            assert!(candle.low <= candle.close, "Low should be <= close");
            assert!(candle.low <= candle.open, "Low should be <= open");
        }
    }

    #[test]
    fn test_scenario_from_str() {
        assert_eq!(
            "Sideways".parse::<MarketScenario>(),
            Ok(MarketScenario::Sideways)
        );
        assert!("flat".parse::<MarketScenario>().is_err());
    }

    #[test]
    fn test_written_csv_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synthetic.csv");
        let candles = SyntheticDataGenerator::new(1).generate(MarketScenario::Sideways, 20);

        write_csv(&path, &candles).unwrap();
        let loaded = load_candles(&path).unwrap();

        assert_eq!(loaded.len(), 20);
        for (written, read) in candles.iter().zip(&loaded) {
            assert_eq!(written.index, read.index);
            assert!((written.close - read.close).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bar_timestamps_are_five_minutes_apart() {
        let gap = bar_timestamp(3) - bar_timestamp(2);
        assert_eq!(gap.num_minutes(), 5);
        assert_eq!(bar_timestamp(0).to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
