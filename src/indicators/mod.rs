// Technical indicators module
// Rolling statistics over closing prices

pub mod moving_average;

pub use moving_average::rolling_sma;
