//! Price feed adapters
//!
//! This module provides the abstractions for fetching intraday price
//! series from external market-data providers, plus the Alpha Vantage
//! implementation used for FX pairs.

pub mod alpha_vantage;
pub mod errors;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use alpha_vantage::{AlphaVantageClient, AlphaVantageConfig};
pub use errors::{FeedError, FeedResult};
pub use traits::PriceFeed;
pub use types::{Candle, IntradaySeries, SERIES_TIMESTAMP_FORMAT};
