use std::num::NonZeroUsize;

/// Calculate the Simple Moving Average (SMA) of every complete window.
///
/// Entry `k` of the result is the mean of `prices[k..k + period]`, so it
/// belongs to index `k + period - 1` of the input. Incomplete leading windows
/// produce no entry, and a series shorter than `period` yields an empty vec.
///
/// Each window is summed on its own rather than with a running sum, so a
/// value never depends on how far into the series it sits.
pub fn rolling_sma(prices: &[f64], period: NonZeroUsize) -> Vec<f64> {
    let period = period.get();

    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}
