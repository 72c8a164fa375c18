//! Release history records and price-move attachment
//!
//! The release history maps each reference month to the recorded outcome
//! of the jobs report covering it. Records are created lazily on first
//! update and overwritten whole; computed price moves are attached to an
//! existing record only, never to a month the user hasn't recorded yet.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::moves::PriceMoveResult;
use super::schedule::ReferenceMonth;

/// Recorded outcome of one jobs report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Consensus forecast (thousands of jobs)
    pub forecast: Option<Decimal>,
    /// Printed value
    pub actual: Option<Decimal>,
    /// Prior month's printed value
    pub previous: Option<Decimal>,
    /// Free-text note on how the market took it
    pub market_reaction: Option<String>,
    #[serde(default)]
    pub notes: String,
    /// Computed post-release moves, attached by the fetch tool
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_moves: Option<PriceMoveResult>,
}

/// The whole release-history store, keyed by reference month
pub type ReleaseHistory = BTreeMap<ReferenceMonth, ReleaseRecord>;

/// Result of attaching price moves to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The month existed; its price-move field was overwritten
    Attached,
    /// The month has no record; the history was left untouched
    UnknownMonth,
}

/// Attach computed moves to the record for `month`
///
/// Full overwrite of the record's `price_moves` field when the month
/// exists; no mutation at all when it doesn't.
pub fn attach_moves(
    month: ReferenceMonth,
    moves: PriceMoveResult,
    history: &mut ReleaseHistory,
) -> AttachOutcome {
    match history.get_mut(&month) {
        Some(record) => {
            record.price_moves = Some(moves);
            AttachOutcome::Attached
        }
        None => AttachOutcome::UnknownMonth,
    }
}

// ============================================================================
// Tests
// ============================================================================
