//! Post-release price move calculation
//!
//! Derives directional price moves (in pips) at fixed offsets after a
//! release timestamp from an intraday price series, and identifies the
//! extreme (max-magnitude, signed) move.
//!
//! Lookups are exact-timestamp only: a release timestamp absent from the
//! series is `MoveError::DataUnavailable`, never an approximated result.
//! Offsets without an observation are skipped; the result carries whatever
//! resolved.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::types::IntradaySeries;

/// One post-release observation point, label plus distance from release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOffset {
    /// Key used in the persisted move map (e.g., "5min_after")
    pub label: String,
    /// Distance after the release timestamp
    pub after: Duration,
}

impl MoveOffset {
    pub fn new(label: &str, after: Duration) -> Self {
        Self {
            label: label.to_string(),
            after,
        }
    }
}

/// Price and signed pip delta at one resolved offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMove {
    pub price: Decimal,
    pub pips: Decimal,
}

/// Computed moves around one release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct PriceMoveResult {
    /// Close at the release timestamp
    pub release_price: Decimal,
    /// Resolved offsets, keyed by offset label
    pub moves: BTreeMap<String, PriceMove>,
    /// Signed pips of the move with the greatest absolute value;
    /// `None` when no offset resolved
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_move: Option<Decimal>,
}

/// Failure of a move computation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    /// The series has no observation at the exact release timestamp
    #[error("no price observation at release timestamp {0}")]
    DataUnavailable(NaiveDateTime),
}

/// Compute post-release price moves from an intraday series
///
/// # Arguments
/// * `series` - Intraday observations keyed by timestamp
/// * `release` - Release timestamp; must be present in `series` exactly
/// * `offsets` - Observation points in declared order (order breaks
///   max-move ties: first occurrence wins)
/// * `pip_scale` - Pips per unit of quote-currency price change
///
/// # Returns
/// * `Ok(PriceMoveResult)` with every offset that resolved; offsets whose
///   timestamp is missing from the series are skipped
/// * `Err(MoveError::DataUnavailable)` when the release timestamp itself
///   has no observation
///
/// Pips are `(close - release_close) * pip_scale`, rounded to one decimal
/// place.
pub fn compute_moves(
    series: &IntradaySeries,
    release: NaiveDateTime,
    offsets: &[MoveOffset],
    pip_scale: Decimal,
) -> Result<PriceMoveResult, MoveError> {
    let release_price = series
        .close_at(release)
        .ok_or(MoveError::DataUnavailable(release))?;

    let mut moves = BTreeMap::new();
    for offset in offsets {
        let target = release + offset.after;
        if let Some(price) = series.close_at(target) {
            let pips = ((price - release_price) * pip_scale).round_dp(1);
            moves.insert(offset.label.clone(), PriceMove { price, pips });
        }
    }

    // Tie-break walks the offsets in declared order, not map order
    let ordered: Vec<PriceMove> = offsets
        .iter()
        .filter_map(|o| moves.get(&o.label).copied())
        .collect();
    let max_move = select_max_move(ordered.iter());

    Ok(PriceMoveResult {
        release_price,
        moves,
        max_move,
    })
}

/// Pick the signed pip value with the greatest absolute magnitude
///
/// Ties keep the earliest entry in iteration order. `None` for an empty
/// iterator.
pub fn select_max_move<'a, I>(moves: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a PriceMove>,
{
    let mut max: Option<Decimal> = None;
    for m in moves {
        match max {
            Some(current) if m.pips.abs() <= current.abs() => {}
            _ => max = Some(m.pips),
        }
    }
    max
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::types::Candle;
    use std::str::FromStr;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn series(points: &[(&str, &str)]) -> IntradaySeries {
        let mut s = IntradaySeries::new();
        for (t, close) in points {
            s.insert(ts(t), Candle::flat(dec(close)));
        }
        s
    }

    fn offsets(minutes: &[(&str, i64)]) -> Vec<MoveOffset> {
        minutes
            .iter()
            .map(|(label, m)| MoveOffset::new(label, Duration::minutes(*m)))
            .collect()
    }

    const SCALE: &str = "100";

    // =========================================================================
    // Release timestamp lookup
    // =========================================================================

    #[test]
    fn test_missing_release_timestamp_is_data_unavailable() {
        let s = series(&[("2026-02-06 13:35:00", "151.50")]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(&s, release, &offsets(&[("5min_after", 5)]), dec(SCALE));

        assert_eq!(result, Err(MoveError::DataUnavailable(release)));
    }

    #[test]
    fn test_empty_series_is_data_unavailable() {
        let s = IntradaySeries::new();
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(&s, release, &offsets(&[("5min_after", 5)]), dec(SCALE));

        assert!(result.is_err());
    }

    // =========================================================================
    // Offset resolution and pip arithmetic
    // =========================================================================

    #[test]
    fn test_example_from_release_window() {
        // series: 13:30 = 151.00, 13:35 = 151.50, 14:00 = 150.20
        // 5min: +50.0 pips, 30min: -80.0 pips, max = -80.0
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.50"),
            ("2026-02-06 14:00:00", "150.20"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(
            &s,
            release,
            &offsets(&[("5min_after", 5), ("30min_after", 30)]),
            dec(SCALE),
        )
        .unwrap();

        assert_eq!(result.release_price, dec("151.00"));
        assert_eq!(result.moves.len(), 2);
        assert_eq!(result.moves["5min_after"].price, dec("151.50"));
        assert_eq!(result.moves["5min_after"].pips, dec("50.0"));
        assert_eq!(result.moves["30min_after"].price, dec("150.20"));
        assert_eq!(result.moves["30min_after"].pips, dec("-80.0"));
        assert_eq!(result.max_move, Some(dec("-80.0")));
    }

    #[test]
    fn test_missing_offset_is_skipped() {
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.50"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(
            &s,
            release,
            &offsets(&[("5min_after", 5), ("30min_after", 30)]),
            dec(SCALE),
        )
        .unwrap();

        assert_eq!(result.moves.len(), 1);
        assert!(result.moves.contains_key("5min_after"));
        assert_eq!(result.max_move, Some(dec("50.0")));
    }

    #[test]
    fn test_zero_resolved_offsets_has_no_max_move() {
        let s = series(&[("2026-02-06 13:30:00", "151.00")]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(
            &s,
            release,
            &offsets(&[("5min_after", 5), ("30min_after", 30)]),
            dec(SCALE),
        )
        .unwrap();

        assert_eq!(result.release_price, dec("151.00"));
        assert!(result.moves.is_empty());
        assert_eq!(result.max_move, None);
    }

    #[test]
    fn test_pips_round_to_one_decimal() {
        // (151.12345 - 151.00) * 100 = 12.345 -> 12.3
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.12345"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result =
            compute_moves(&s, release, &offsets(&[("5min_after", 5)]), dec(SCALE)).unwrap();

        assert_eq!(result.moves["5min_after"].pips, dec("12.3"));
    }

    #[test]
    fn test_pip_scale_is_configurable() {
        // Four-decimal quote: 0.0050 at scale 10000 = 50 pips
        let s = series(&[
            ("2026-02-06 13:30:00", "1.0850"),
            ("2026-02-06 13:35:00", "1.0900"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result =
            compute_moves(&s, release, &offsets(&[("5min_after", 5)]), dec("10000")).unwrap();

        assert_eq!(result.moves["5min_after"].pips, dec("50.0"));
    }

    // =========================================================================
    // Max move selection
    // =========================================================================

    #[test]
    fn test_max_move_picks_greatest_absolute_value() {
        // +50, +80, +70 -> +80
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.50"),
            ("2026-02-06 14:00:00", "151.80"),
            ("2026-02-06 14:30:00", "151.70"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(
            &s,
            release,
            &offsets(&[("5min_after", 5), ("30min_after", 30), ("1h_after", 60)]),
            dec(SCALE),
        )
        .unwrap();

        assert_eq!(result.max_move, Some(dec("80.0")));
    }

    #[test]
    fn test_max_move_tie_keeps_first_declared_offset() {
        // +60 at 5min, -60 at 30min: tie resolves to the earlier offset
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.60"),
            ("2026-02-06 14:00:00", "150.40"),
        ]);
        let release = ts("2026-02-06 13:30:00");

        let result = compute_moves(
            &s,
            release,
            &offsets(&[("5min_after", 5), ("30min_after", 30)]),
            dec(SCALE),
        )
        .unwrap();

        assert_eq!(result.max_move, Some(dec("60.0")));
    }

    #[test]
    fn test_select_max_move_empty_is_none() {
        let empty: Vec<PriceMove> = Vec::new();
        assert_eq!(select_max_move(&empty), None);
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn test_compute_moves_is_deterministic() {
        let s = series(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.50"),
            ("2026-02-06 14:00:00", "150.20"),
        ]);
        let release = ts("2026-02-06 13:30:00");
        let offs = offsets(&[("5min_after", 5), ("30min_after", 30)]);

        let first = compute_moves(&s, release, &offs, dec(SCALE)).unwrap();
        let second = compute_moves(&s, release, &offs, dec(SCALE)).unwrap();

        assert_eq!(first, second);
    }
}
