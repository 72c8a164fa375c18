//! Shared types for price feed adapters

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Timestamp format used by the intraday feed ("2026-02-06 13:30:00")
pub const SERIES_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One OHLC observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candle {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Candle {
    /// Candle with all four fields equal; handy for tests and manual data
    pub fn flat(price: Decimal) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }
}

/// Intraday price series keyed by observation timestamp
///
/// Lookups are exact: consumers asking for a timestamp the feed did not
/// deliver get `None`, never a neighboring observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntradaySeries {
    observations: BTreeMap<NaiveDateTime, Candle>,
}

impl IntradaySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timestamp: NaiveDateTime, candle: Candle) {
        self.observations.insert(timestamp, candle);
    }

    /// Observation at exactly `timestamp`
    pub fn get(&self, timestamp: NaiveDateTime) -> Option<&Candle> {
        self.observations.get(&timestamp)
    }

    /// Close price at exactly `timestamp`
    pub fn close_at(&self, timestamp: NaiveDateTime) -> Option<Decimal> {
        self.observations.get(&timestamp).map(|c| c.close)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest observation timestamp (for diagnostics)
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.keys().next().copied()
    }

    /// Latest observation timestamp (for diagnostics)
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.keys().next_back().copied()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, SERIES_TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_exact_lookup_only() {
        let mut series = IntradaySeries::new();
        series.insert(ts("2026-02-06 13:30:00"), Candle::flat(Decimal::from_str("151.00").unwrap()));

        assert!(series.close_at(ts("2026-02-06 13:30:00")).is_some());
        // One second off is a miss, not a nearest-match
        assert!(series.close_at(ts("2026-02-06 13:30:01")).is_none());
        assert!(series.close_at(ts("2026-02-06 13:29:59")).is_none());
    }

    #[test]
    fn test_timestamp_range() {
        let mut series = IntradaySeries::new();
        series.insert(ts("2026-02-06 13:35:00"), Candle::flat(Decimal::ONE));
        series.insert(ts("2026-02-06 13:30:00"), Candle::flat(Decimal::ONE));

        assert_eq!(series.first_timestamp(), Some(ts("2026-02-06 13:30:00")));
        assert_eq!(series.last_timestamp(), Some(ts("2026-02-06 13:35:00")));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_empty_series() {
        let series = IntradaySeries::new();
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);
    }
}
