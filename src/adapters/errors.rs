//! Error types for price feed adapters
//!
//! Feed failures are operator diagnostics, not crashes: every variant is
//! surfaced to the caller and recovery is a manual re-invocation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network/transport failure talking to the feed
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed throttled us (free tiers have daily request budgets)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The feed answered with an error payload (bad key, bad symbol, ...)
    #[error("Feed API error: {0}")]
    Api(String),

    /// The feed answered 200 but the payload wasn't the expected shape
    #[error("Malformed feed response: {0}")]
    Malformed(String),

    /// The instrument pair string isn't BASE/QUOTE
    #[error("Invalid instrument pair '{0}', expected BASE/QUOTE")]
    InvalidPair(String),
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
