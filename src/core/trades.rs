//! Manual trade log and running statistics

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged trade around an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique identifier (UUID v4)
    pub id: Uuid,
    pub date: NaiveDate,
    /// Event the trade was taken around (e.g., "NFP", "CPI")
    pub indicator: String,
    pub entry: Decimal,
    pub exit: Decimal,
    /// Realized result in account currency
    pub pnl: Decimal,
    #[serde(default)]
    pub notes: String,
}

impl TradeRecord {
    /// Create a trade record with an auto-generated id
    pub fn new(
        date: NaiveDate,
        indicator: String,
        entry: Decimal,
        exit: Decimal,
        pnl: Decimal,
        notes: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            indicator,
            entry,
            exit,
            pnl,
            notes,
        }
    }
}

/// One point of the cumulative P&L series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Aggregate statistics over the trade log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub total_pnl: Decimal,
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    /// Wins as a percentage of all trades (flat trades count in the
    /// denominator only); 0.0 for an empty log
    pub win_rate: f64,
    /// Running P&L total in date order (stable for equal dates)
    pub cumulative: Vec<CumulativePoint>,
}

/// Compute statistics over the trade log
pub fn trade_stats(trades: &[TradeRecord]) -> TradeStats {
    let total_pnl: Decimal = trades.iter().map(|t| t.pnl).sum();
    let win_count = trades.iter().filter(|t| t.pnl > Decimal::ZERO).count();
    let loss_count = trades.iter().filter(|t| t.pnl < Decimal::ZERO).count();
    let trade_count = trades.len();
    let win_rate = if trade_count > 0 {
        win_count as f64 / trade_count as f64 * 100.0
    } else {
        0.0
    };

    let mut by_date: Vec<&TradeRecord> = trades.iter().collect();
    by_date.sort_by_key(|t| t.date);

    let mut cumulative = Vec::with_capacity(trade_count);
    let mut running_total = Decimal::ZERO;
    for trade in by_date {
        running_total += trade.pnl;
        cumulative.push(CumulativePoint {
            date: trade.date,
            total: running_total,
        });
    }

    TradeStats {
        total_pnl,
        trade_count,
        win_count,
        loss_count,
        win_rate,
        cumulative,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn trade(d: &str, pnl: &str) -> TradeRecord {
        TradeRecord::new(
            date(d),
            "NFP".to_string(),
            dec("151.00"),
            dec("151.50"),
            dec(pnl),
            String::new(),
        )
    }

    #[test]
    fn test_stats_known_values() {
        let trades = vec![
            trade("2026-02-06", "120.50"),
            trade("2026-03-06", "-60.00"),
            trade("2026-04-03", "39.50"),
        ];

        let stats = trade_stats(&trades);

        assert_eq!(stats.total_pnl, dec("100.00"));
        assert_eq!(stats.trade_count, 3);
        assert_eq!(stats.win_count, 2);
        assert_eq!(stats.loss_count, 1);
        assert!((stats.win_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_stats_empty_log() {
        let stats = trade_stats(&[]);

        assert_eq!(stats.total_pnl, Decimal::ZERO);
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.cumulative.is_empty());
    }

    #[test]
    fn test_flat_trades_count_in_denominator_only() {
        let trades = vec![trade("2026-02-06", "50"), trade("2026-03-06", "0")];

        let stats = trade_stats(&trades);

        assert_eq!(stats.win_count, 1);
        assert_eq!(stats.loss_count, 0);
        assert_eq!(stats.trade_count, 2);
        assert!((stats.win_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cumulative_series_in_date_order() {
        // Logged out of order
        let trades = vec![
            trade("2026-03-06", "-30"),
            trade("2026-02-06", "100"),
        ];

        let stats = trade_stats(&trades);

        assert_eq!(stats.cumulative.len(), 2);
        assert_eq!(stats.cumulative[0].date, date("2026-02-06"));
        assert_eq!(stats.cumulative[0].total, dec("100"));
        assert_eq!(stats.cumulative[1].date, date("2026-03-06"));
        assert_eq!(stats.cumulative[1].total, dec("70"));
    }

    #[test]
    fn test_trade_record_round_trips_through_json() {
        let record = trade("2026-02-06", "25.5");
        let json = serde_json::to_string(&record).unwrap();
        let back: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
