//! Port trait implemented by price feed adapters

use async_trait::async_trait;

use super::errors::FeedResult;
use super::types::IntradaySeries;

/// A source of intraday price observations for one instrument pair
///
/// Implementations own their transport, credentials and timeouts. The
/// caller treats a returned error as non-fatal and never retries
/// automatically.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the most recent intraday series for `pair` (BASE/QUOTE)
    async fn intraday(&self, pair: &str) -> FeedResult<IntradaySeries>;
}
