use std::num::NonZeroUsize;

use crate::indicators::rolling_sma;
use crate::models::{Candle, Signal};
use crate::strategy::Strategy;

/// Signal at one row that had a complete window behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    /// Row ordinal in the input
    pub index: usize,
    pub close: f64,
    pub rolling_mean: f64,
    pub signal: Signal,
}

/// Ordered signals for every non-warm-up row.
///
/// Warm-up rows (the first `window - 1`) have no entry, so the series holds
/// `input_rows - window + 1` points, or none when the input is shorter than
/// the window.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    window: NonZeroUsize,
    input_rows: usize,
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn window(&self) -> NonZeroUsize {
        self.window
    }

    /// Number of candles the series was computed from, warm-up included
    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rows excluded because their window was incomplete
    pub fn warmup_rows(&self) -> usize {
        self.input_rows - self.points.len()
    }

    /// Count of rows whose close was strictly above the rolling mean
    pub fn above_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.signal == Signal::Above)
            .count()
    }
}

/// Compute the rolling-mean signal for each row with a full window.
///
/// For `i >= window - 1`, `rolling_mean[i]` is the mean of
/// `close[i - window + 1..=i]` and the signal is `Above` iff
/// `close[i] > rolling_mean[i]`. Ties are `AtOrBelow`. Input shorter than the
/// window yields an empty series, which is not an error here.
pub fn generate_signals(candles: &[Candle], window: NonZeroUsize) -> SignalSeries {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let means = rolling_sma(&closes, window);
    let first_full = (window.get() - 1).min(candles.len());

    let points = candles[first_full..]
        .iter()
        .zip(means)
        .map(|(candle, rolling_mean)| SignalPoint {
            index: candle.index,
            close: candle.close,
            rolling_mean,
            signal: Signal::from_close(candle.close, rolling_mean),
        })
        .collect();

    SignalSeries {
        window,
        input_rows: candles.len(),
        points,
    }
}

/// Close-above-rolling-mean strategy
#[derive(Debug, Clone, Copy)]
pub struct RollingMeanStrategy {
    window: NonZeroUsize,
}

impl RollingMeanStrategy {
    pub fn new(window: NonZeroUsize) -> Self {
        Self { window }
    }
}

impl Strategy for RollingMeanStrategy {
    fn generate_signals(&self, candles: &[Candle]) -> SignalSeries {
        tracing::info!("Rolling mean calculated with window={}", self.window);
        let series = generate_signals(candles, self.window);
        tracing::debug!(
            "{} signals, {} warm-up rows, {} above mean",
            series.len(),
            series.warmup_rows(),
            series.above_count()
        );
        series
    }

    fn name(&self) -> &str {
        "rolling_mean"
    }

    fn min_candles_required(&self) -> usize {
        self.window.get()
    }
}
