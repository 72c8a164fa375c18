//! Flat-file JSON stores
//!
//! Each collection (release history, speech log, trade log) is one JSON
//! file read in full before an operation and written in full after any
//! mutation. A missing file reads as the empty collection. Single-user,
//! single-process; no locking.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::core::releases::{ReleaseHistory, ReleaseRecord};
use crate::core::schedule::ReferenceMonth;
use crate::core::speeches::SpeechEntry;
use crate::core::trades::TradeRecord;
use crate::error::Result;

const RELEASES_FILE: &str = "release_history.json";
const SPEECHES_FILE: &str = "speeches.json";
const TRADES_FILE: &str = "trades.json";

/// Handle on the data directory holding the JSON stores
#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ------------------------------------------------------------------
    // Release history
    // ------------------------------------------------------------------

    pub fn load_releases(&self) -> Result<ReleaseHistory> {
        self.load_json(RELEASES_FILE)
    }

    pub fn save_releases(&self, history: &ReleaseHistory) -> Result<()> {
        self.save_json(RELEASES_FILE, history)
    }

    /// Overwrite (or lazily create) the record for one month
    pub fn update_release(&self, month: ReferenceMonth, record: ReleaseRecord) -> Result<()> {
        let mut history = self.load_releases()?;
        history.insert(month, record);
        self.save_releases(&history)
    }

    // ------------------------------------------------------------------
    // Speech log
    // ------------------------------------------------------------------

    pub fn load_speeches(&self) -> Result<Vec<SpeechEntry>> {
        self.load_json(SPEECHES_FILE)
    }

    pub fn save_speeches(&self, speeches: &[SpeechEntry]) -> Result<()> {
        self.save_json(SPEECHES_FILE, &speeches)
    }

    /// Append one entry to the speech log
    pub fn append_speech(&self, entry: SpeechEntry) -> Result<()> {
        let mut speeches = self.load_speeches()?;
        speeches.push(entry);
        self.save_speeches(&speeches)
    }

    // ------------------------------------------------------------------
    // Trade log
    // ------------------------------------------------------------------

    pub fn load_trades(&self) -> Result<Vec<TradeRecord>> {
        self.load_json(TRADES_FILE)
    }

    pub fn save_trades(&self, trades: &[TradeRecord]) -> Result<()> {
        self.save_json(TRADES_FILE, &trades)
    }

    /// Append one record to the trade log
    pub fn append_trade(&self, record: TradeRecord) -> Result<()> {
        let mut trades = self.load_trades()?;
        trades.push(record);
        self.save_trades(&trades)
    }

    // ------------------------------------------------------------------
    // Whole-file helpers
    // ------------------------------------------------------------------

    fn load_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            debug!(file = %path.display(), "Store file missing, reading as empty");
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(name);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)?;
        debug!(file = %path.display(), "Store file written");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
