pub mod cache;
pub mod provider;
pub mod series;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use cache::{FetchCache, FetchKey};
pub use provider::MarketDataClient;
pub use series::{DailyBar, PriceSeries};
