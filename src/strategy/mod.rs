// Signal strategy module
pub mod signals;

use crate::models::Candle;

pub use signals::{generate_signals, RollingMeanStrategy, SignalPoint, SignalSeries};

/// Base trait for per-row signal strategies
pub trait Strategy {
    /// Derive the signal series for an ordered candle sequence.
    /// Pure: the same candles always give the same series.
    fn generate_signals(&self, candles: &[Candle]) -> SignalSeries;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum candles required before the first signal is produced
    fn min_candles_required(&self) -> usize;
}
