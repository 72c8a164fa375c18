//! Alpha Vantage FX intraday feed client
//!
//! Wraps the `FX_INTRADAY` endpoint. The free tier caps requests per day
//! and signals throttling with a `Note` payload instead of an HTTP status,
//! so response triage inspects the body before the series key.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::constants;

use super::errors::{FeedError, FeedResult};
use super::traits::PriceFeed;
use super::types::{Candle, IntradaySeries, SERIES_TIMESTAMP_FORMAT};

/// JSON key under which Alpha Vantage nests the candle map
const SERIES_KEY: &str = "Time Series FX (Intraday)";

/// Alpha Vantage client configuration
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    /// API key; the public "demo" key only serves canned symbols
    pub api_key: String,
    /// Query endpoint URL
    pub base_url: String,
    /// Candle interval requested (e.g., "5min")
    pub interval: String,
    /// Request timeout
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `ALPHA_VANTAGE_API_KEY`; a missing or placeholder value falls
    /// back to the public "demo" key with a warning (matches the feed's
    /// own documentation examples, but real symbols will be rejected).
    /// Base URL, interval and timeout come from `config::constants`.
    pub fn from_env() -> Self {
        let api_key = match std::env::var("ALPHA_VANTAGE_API_KEY") {
            Ok(k) if !k.trim().is_empty() && !k.contains("your-api-key") => k,
            Ok(_) => {
                warn!("ALPHA_VANTAGE_API_KEY contains placeholder value, using 'demo'");
                "demo".to_string()
            }
            Err(_) => {
                warn!("ALPHA_VANTAGE_API_KEY not set, using 'demo'");
                "demo".to_string()
            }
        };

        Self {
            api_key,
            base_url: constants::alpha_vantage_base_url(),
            interval: constants::feed_interval(),
            timeout: constants::feed_timeout(),
        }
    }

    /// Replace the API key (CLI override path)
    pub fn with_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }
}

/// HTTP client for the Alpha Vantage FX intraday endpoint
pub struct AlphaVantageClient {
    config: AlphaVantageConfig,
    client: reqwest::Client,
}

impl AlphaVantageClient {
    pub fn new(config: AlphaVantageConfig) -> FeedResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl PriceFeed for AlphaVantageClient {
    async fn intraday(&self, pair: &str) -> FeedResult<IntradaySeries> {
        let (from_symbol, to_symbol) = split_pair(pair)?;

        debug!(pair = %pair, interval = %self.config.interval, "Requesting FX intraday series");
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("function", "FX_INTRADAY"),
                ("from_symbol", from_symbol),
                ("to_symbol", to_symbol),
                ("interval", self.config.interval.as_str()),
                ("outputsize", "full"),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(FeedError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: Value = response.json().await?;
        parse_intraday_body(&body)
    }
}

/// Split "USD/JPY" into ("USD", "JPY")
fn split_pair(pair: &str) -> FeedResult<(&str, &str)> {
    match pair.split_once('/') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => Ok((from, to)),
        _ => Err(FeedError::InvalidPair(pair.to_string())),
    }
}

/// Triage an FX_INTRADAY body into a series or a feed error
fn parse_intraday_body(body: &Value) -> FeedResult<IntradaySeries> {
    // Throttling and API errors come back as 200s with a message field
    if let Some(note) = body.get("Note").and_then(Value::as_str) {
        return Err(FeedError::RateLimited(note.to_string()));
    }
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(FeedError::Api(message.to_string()));
    }

    let raw_series = body
        .get(SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| FeedError::Malformed(format!("missing '{}' object", SERIES_KEY)))?;

    let mut series = IntradaySeries::new();
    for (timestamp_str, fields) in raw_series {
        let timestamp = NaiveDateTime::parse_from_str(timestamp_str, SERIES_TIMESTAMP_FORMAT)
            .map_err(|e| {
                FeedError::Malformed(format!("bad timestamp '{}': {}", timestamp_str, e))
            })?;
        series.insert(timestamp, parse_candle(timestamp_str, fields)?);
    }

    debug!(
        observations = series.len(),
        "Parsed FX intraday series"
    );
    Ok(series)
}

fn parse_candle(timestamp: &str, fields: &Value) -> FeedResult<Candle> {
    let field = |name: &str| -> FeedResult<Decimal> {
        let raw = fields.get(name).and_then(Value::as_str).ok_or_else(|| {
            FeedError::Malformed(format!("candle {} missing field '{}'", timestamp, name))
        })?;
        Decimal::from_str(raw).map_err(|e| {
            FeedError::Malformed(format!(
                "candle {} field '{}' not a decimal ('{}'): {}",
                timestamp, name, raw, e
            ))
        })
    };

    Ok(Candle {
        open: field("1. open")?,
        high: field("2. high")?,
        low: field("3. low")?,
        close: field("4. close")?,
    })
}

// ============================================================================
// Tests
// ============================================================================
