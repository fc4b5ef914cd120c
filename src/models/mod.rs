/// One OHLCV row, immutable once loaded.
///
/// `index` is the 0-based position of the row in the input file; input order
/// is significant because every rolling statistic depends on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(index: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            index,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Binary above/below-mean signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Close strictly above its rolling mean
    Above,
    /// Close equal to or below its rolling mean (ties land here)
    AtOrBelow,
}

impl Signal {
    pub fn from_close(close: f64, rolling_mean: f64) -> Self {
        if close > rolling_mean {
            Signal::Above
        } else {
            Signal::AtOrBelow
        }
    }

    /// 1.0 for `Above`, 0.0 otherwise
    pub fn as_unit(self) -> f64 {
        match self {
            Signal::Above => 1.0,
            Signal::AtOrBelow => 0.0,
        }
    }
}
