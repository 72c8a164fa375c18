//! Configuration types for the dashboard
//!
//! This module defines all configuration structs that are loaded from YAML.
//! The instrument pip scale and the move-offset table live here so the
//! price-move calculator never hard-codes either.

use std::path::PathBuf;

use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::moves::MoveOffset;
use crate::error::AppError;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Instrument the dashboard tracks price moves for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Currency pair in BASE/QUOTE notation (e.g., "USD/JPY")
    pub pair: String,
    /// Pips per unit of quote-currency price change
    /// (100 for two-decimal quotes like JPY, 10000 for four-decimal quotes)
    pub pip_scale: Decimal,
}

/// When the tracked release hits the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Release time of day, UTC (e.g., "13:30:00" = 22:30 JST)
    pub time_utc: NaiveTime,
}

/// One post-release observation offset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Label used as the key in persisted move maps (e.g., "5min_after")
    pub label: String,
    /// Minutes after the release timestamp
    pub minutes: i64,
}

/// Where the flat-file JSON stores live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding release_history.json, speeches.json, trades.json
    pub data_dir: PathBuf,
}

/// Paths to loaded-once data resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Yearly event schedule (YAML)
    pub schedule_file: PathBuf,
    /// Central-bank official roster (YAML)
    pub officials_file: PathBuf,
    /// Bulk-populate dataset of known historical moves (YAML)
    pub historical_moves_file: PathBuf,
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub instrument: InstrumentConfig,
    pub release: ReleaseConfig,
    pub offsets: Vec<OffsetConfig>,
    pub storage: StorageConfig,
    pub resources: ResourceConfig,
}

impl AppConfig {
    /// Validate configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        // Rule: pair must be BASE/QUOTE
        let parts: Vec<&str> = self.instrument.pair.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "instrument.pair must be BASE/QUOTE notation (got '{}')",
                self.instrument.pair
            )));
        }

        // Rule: pip scale must be positive
        if self.instrument.pip_scale <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "instrument.pip_scale must be > 0 (got {})",
                self.instrument.pip_scale
            )));
        }

        // Rule: at least one offset, each with a unique non-empty label
        if self.offsets.is_empty() {
            return Err(AppError::Config(
                "offsets must contain at least one entry".to_string(),
            ));
        }
        for (i, offset) in self.offsets.iter().enumerate() {
            if offset.label.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "offsets[{}]: label cannot be empty",
                    i
                )));
            }
            if offset.minutes <= 0 {
                return Err(AppError::Config(format!(
                    "offset '{}': minutes must be > 0 (got {})",
                    offset.label, offset.minutes
                )));
            }
            if self.offsets[..i].iter().any(|o| o.label == offset.label) {
                return Err(AppError::Config(format!(
                    "offset label '{}' appears more than once",
                    offset.label
                )));
            }
        }

        // Rule: storage directory must be set
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "storage.data_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Offset table in declared order, as the calculator consumes it
    pub fn move_offsets(&self) -> Vec<MoveOffset> {
        self.offsets
            .iter()
            .map(|o| MoveOffset::new(&o.label, Duration::minutes(o.minutes)))
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentConfig {
                pair: "USD/JPY".to_string(),
                pip_scale: Decimal::from(100),
            },
            release: ReleaseConfig {
                // 13:30 UTC = 22:30 JST
                time_utc: NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
            },
            offsets: vec![
                OffsetConfig { label: "5min_after".to_string(), minutes: 5 },
                OffsetConfig { label: "15min_after".to_string(), minutes: 15 },
                OffsetConfig { label: "30min_after".to_string(), minutes: 30 },
                OffsetConfig { label: "1h_after".to_string(), minutes: 60 },
            ],
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
            resources: ResourceConfig {
                schedule_file: PathBuf::from("data/schedule_2026.yaml"),
                officials_file: PathBuf::from("data/officials.yaml"),
                historical_moves_file: PathBuf::from("data/historical_moves.yaml"),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_pair_rejected() {
        let mut config = AppConfig::default();
        config.instrument.pair = "USDJPY".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BASE/QUOTE"));
    }

    #[test]
    fn test_zero_pip_scale_rejected() {
        let mut config = AppConfig::default();
        config.instrument.pip_scale = Decimal::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pip_scale"));
    }

    #[test]
    fn test_empty_offsets_rejected() {
        let mut config = AppConfig::default();
        config.offsets.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_duplicate_offset_label_rejected() {
        let mut config = AppConfig::default();
        config.offsets.push(OffsetConfig {
            label: "5min_after".to_string(),
            minutes: 10,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_nonpositive_offset_minutes_rejected() {
        let mut config = AppConfig::default();
        config.offsets[0].minutes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("minutes must be > 0"));
    }

    #[test]
    fn test_move_offsets_preserve_declared_order() {
        let config = AppConfig::default();
        let offsets = config.move_offsets();
        let labels: Vec<&str> = offsets.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["5min_after", "15min_after", "30min_after", "1h_after"]);
        assert_eq!(offsets[3].after, Duration::minutes(60));
    }
}
