//! Central-bank commentary log and official roster
//!
//! Speeches are an append-only JSON log; the roster of officials (display
//! name plus a 1-3 market-weight rating) is a YAML resource loaded once,
//! used by the speech view to annotate entries.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Policy stance conveyed by a speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Hawkish,
    Dovish,
    Neutral,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Hawkish => write!(f, "hawkish"),
            Stance::Dovish => write!(f, "dovish"),
            Stance::Neutral => write!(f, "neutral"),
        }
    }
}

impl std::str::FromStr for Stance {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hawkish" => Ok(Stance::Hawkish),
            "dovish" => Ok(Stance::Dovish),
            "neutral" => Ok(Stance::Neutral),
            other => Err(AppError::Config(format!(
                "unknown stance '{}', expected hawkish|dovish|neutral",
                other
            ))),
        }
    }
}

/// One logged speech or set of remarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechEntry {
    pub date: NaiveDate,
    /// Roster key of the speaker (e.g., "Powell")
    pub official: String,
    pub summary: String,
    pub stance: Stance,
    /// How the market reacted, free text; empty when not noted
    #[serde(default)]
    pub market_reaction: String,
}

/// The speech log, newest entries sorted to the front
///
/// Stable sort: entries sharing a date keep their log order.
pub fn latest_first(log: &[SpeechEntry]) -> Vec<&SpeechEntry> {
    let mut sorted: Vec<&SpeechEntry> = log.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

// ============================================================================
// Official roster
// ============================================================================

/// One roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    /// Display name (e.g., "Chair Powell")
    pub name: String,
    /// Market weight, 1 (minor) to 3 (market-moving)
    pub weight: u8,
}

impl Official {
    /// Weight rendered as filled/hollow stars ("★★☆")
    pub fn stars(&self) -> String {
        let filled = self.weight.min(3) as usize;
        "★".repeat(filled) + &"☆".repeat(3 - filled)
    }
}

/// Roster of known officials, keyed by speaker id
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OfficialRoster {
    officials: BTreeMap<String, Official>,
}

impl OfficialRoster {
    /// Load the roster from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Officials file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load the roster from a YAML string
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, AppError> {
        let roster: Self = serde_yaml::from_str(yaml_content)
            .map_err(|e| AppError::Config(format!("Officials YAML parse error: {}", e)))?;

        for (id, official) in &roster.officials {
            if !(1..=3).contains(&official.weight) {
                return Err(AppError::Config(format!(
                    "official '{}': weight must be 1-3 (got {})",
                    id, official.weight
                )));
            }
        }

        Ok(roster)
    }

    pub fn get(&self, id: &str) -> Option<&Official> {
        self.officials.get(id)
    }

    pub fn len(&self) -> usize {
        self.officials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.officials.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
