//! Application-wide constants and configuration defaults
//!
//! This module centralizes hardcoded values to make them configurable
//! and maintainable. Values can be overridden via environment variables.

use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Paths
// =============================================================================

/// Path to the application configuration file (default: `config.yaml`)
///
/// Environment variable: `CONFIG_PATH`
pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"))
}

// =============================================================================
// Price Feed Configuration
// =============================================================================

/// Alpha Vantage query endpoint (default: the public production URL)
///
/// Environment variable: `ALPHA_VANTAGE_BASE_URL` (pointed at a local
/// server in feed client tests)
pub fn alpha_vantage_base_url() -> String {
    std::env::var("ALPHA_VANTAGE_BASE_URL")
        .unwrap_or_else(|_| "https://www.alphavantage.co/query".to_string())
}

/// Price feed request timeout (default: 30 seconds)
///
/// Environment variable: `FEED_TIMEOUT_SECS`
pub fn feed_timeout() -> Duration {
    let secs = std::env::var("FEED_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Intraday candle interval requested from the feed (default: "5min")
///
/// Environment variable: `FEED_INTERVAL`
pub fn feed_interval() -> String {
    std::env::var("FEED_INTERVAL").unwrap_or_else(|_| "5min".to_string())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print all configuration values (for debugging/startup logs)
pub fn log_configuration() {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("  - Config path: {}", config_path().display());
    tracing::info!("  - Feed base URL: {}", alpha_vantage_base_url());
    tracing::info!("  - Feed timeout: {:?}", feed_timeout());
    tracing::info!("  - Feed interval: {}", feed_interval());
    tracing::info!("==================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(env)]
    fn test_default_values() {
        std::env::remove_var("CONFIG_PATH");
        std::env::remove_var("FEED_TIMEOUT_SECS");
        std::env::remove_var("FEED_INTERVAL");

        assert_eq!(config_path(), PathBuf::from("config.yaml"));
        assert_eq!(feed_timeout(), Duration::from_secs(30));
        assert_eq!(feed_interval(), "5min");
    }

    #[test]
    #[serial(env)]
    fn test_env_override() {
        std::env::set_var("FEED_TIMEOUT_SECS", "5");

        assert_eq!(feed_timeout(), Duration::from_secs(5));

        std::env::remove_var("FEED_TIMEOUT_SECS");
    }
}
