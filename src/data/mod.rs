// Dataset input: CSV loading and seeded synthetic fixtures
pub mod loader;
pub mod synthetic;

pub use loader::load_candles;
pub use synthetic::{write_csv, MarketScenario, SyntheticDataGenerator};
