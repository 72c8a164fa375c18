//! Release-update workflows shared by the fetch tool and tests
//!
//! Three ways move data reaches the release history:
//! - bulk-populate from a curated YAML dataset of known historical moves
//! - fetch-and-compute from the intraday feed for one release date
//! - manual supply of per-offset prices (feed budget workaround)
//!
//! All three only ever attach to months already recorded in the history;
//! unknown months are reported, never created here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::adapters::traits::PriceFeed;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::store::DataStore;

use super::moves::{compute_moves, select_max_move, PriceMove, PriceMoveResult};
use super::releases::{attach_moves, AttachOutcome};
use super::schedule::{ReferenceMonth, Schedule};

/// Result of a fetch-and-attach run
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    /// Reference month the moves were attributed to
    pub month: ReferenceMonth,
    pub moves: PriceMoveResult,
    pub outcome: AttachOutcome,
}

/// Result of a bulk populate run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateReport {
    pub attached: Vec<ReferenceMonth>,
    /// Months in the dataset with no history record to attach to
    pub skipped: Vec<ReferenceMonth>,
}

/// Fetch the intraday series, compute moves for `release_date` and attach
/// them to the covered month's record
///
/// The covered month comes from the schedule when `release_date` is a
/// scheduled jobs report; otherwise it falls back to the preceding
/// calendar month (a jobs report always describes the month before it).
///
/// Nothing is persisted unless the month already has a history record.
pub async fn fetch_and_attach<F: PriceFeed + ?Sized>(
    feed: &F,
    schedule: &Schedule,
    store: &DataStore,
    config: &AppConfig,
    release_date: NaiveDate,
) -> Result<FetchReport> {
    let series = feed.intraday(&config.instrument.pair).await?;
    info!(
        pair = %config.instrument.pair,
        observations = series.len(),
        "Fetched intraday series"
    );

    let release_ts = release_date.and_time(config.release.time_utc);
    let moves = compute_moves(
        &series,
        release_ts,
        &config.move_offsets(),
        config.instrument.pip_scale,
    )?;

    let month = match schedule.reference_month_for_date(release_date) {
        Some(month) => month,
        None => {
            let fallback = ReferenceMonth::from_date(release_date).prev();
            warn!(
                date = %release_date,
                month = %fallback,
                "Release date not on the schedule, assuming preceding calendar month"
            );
            fallback
        }
    };

    let mut history = store.load_releases()?;
    let outcome = attach_moves(month, moves.clone(), &mut history);
    match outcome {
        AttachOutcome::Attached => {
            store.save_releases(&history)?;
            info!(month = %month, "Price moves attached");
        }
        AttachOutcome::UnknownMonth => {
            warn!(month = %month, "Month not in release history, nothing persisted");
        }
    }

    Ok(FetchReport {
        month,
        moves,
        outcome,
    })
}

/// Attach the curated historical-move dataset to every month that already
/// has a history record
pub fn populate_from_file(store: &DataStore, path: &Path) -> Result<PopulateReport> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Historical moves file not found: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    let dataset: BTreeMap<ReferenceMonth, PriceMoveResult> = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Historical moves YAML parse error: {}", e)))?;

    let mut history = store.load_releases()?;
    let mut report = PopulateReport::default();

    for (month, moves) in dataset {
        match attach_moves(month, moves, &mut history) {
            AttachOutcome::Attached => report.attached.push(month),
            AttachOutcome::UnknownMonth => report.skipped.push(month),
        }
    }

    if !report.attached.is_empty() {
        store.save_releases(&history)?;
    }
    info!(
        attached = report.attached.len(),
        skipped = report.skipped.len(),
        "Historical moves populated"
    );

    Ok(report)
}

/// Build a move result from manually supplied per-offset prices and attach
/// it to `month`'s record
///
/// Pips are derived from `release_price` the same way the calculator does
/// it; the max move keeps the supplied order for ties.
pub fn manual_attach(
    store: &DataStore,
    month: ReferenceMonth,
    release_price: Decimal,
    offset_prices: &[(String, Decimal)],
    pip_scale: Decimal,
) -> Result<(AttachOutcome, PriceMoveResult)> {
    let mut moves = BTreeMap::new();
    let mut ordered = Vec::with_capacity(offset_prices.len());
    for (label, price) in offset_prices {
        let pips = ((*price - release_price) * pip_scale).round_dp(1);
        let price_move = PriceMove {
            price: *price,
            pips,
        };
        moves.insert(label.clone(), price_move);
        ordered.push(price_move);
    }

    let result = PriceMoveResult {
        release_price,
        max_move: select_max_move(ordered.iter()),
        moves,
    };

    let mut history = store.load_releases()?;
    let outcome = attach_moves(month, result.clone(), &mut history);
    if outcome == AttachOutcome::Attached {
        store.save_releases(&history)?;
    }

    Ok((outcome, result))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::{NamedTempFile, TempDir};

    use crate::adapters::errors::FeedResult;
    use crate::adapters::types::{Candle, IntradaySeries};
    use crate::core::moves::MoveError;
    use crate::core::releases::ReleaseRecord;

    fn month(s: &str) -> ReferenceMonth {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn store_with(months: &[&str]) -> (TempDir, DataStore) {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path());
        for m in months {
            store.update_release(month(m), ReleaseRecord::default()).unwrap();
        }
        (dir, store)
    }

    fn schedule() -> Schedule {
        Schedule::from_yaml_str(
            r#"
jobs_reports:
  - { date: "2026-01-09", reference_month: "2025-12" }
  - { date: "2026-02-06", reference_month: "2026-01" }
"#,
        )
        .unwrap()
    }

    /// Feed stub serving one canned series
    struct StubFeed {
        series: IntradaySeries,
    }

    #[async_trait]
    impl PriceFeed for StubFeed {
        async fn intraday(&self, _pair: &str) -> FeedResult<IntradaySeries> {
            Ok(self.series.clone())
        }
    }

    fn feed_with(points: &[(&str, &str)]) -> StubFeed {
        let mut series = IntradaySeries::new();
        for (t, close) in points {
            let ts = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").unwrap();
            series.insert(ts, Candle::flat(dec(close)));
        }
        StubFeed { series }
    }

    // =========================================================================
    // fetch_and_attach
    // =========================================================================

    #[tokio::test]
    async fn test_fetch_and_attach_scheduled_date() {
        let (_dir, store) = store_with(&["2026-01"]);
        let feed = feed_with(&[
            ("2026-02-06 13:30:00", "151.00"),
            ("2026-02-06 13:35:00", "151.50"),
        ]);

        let report = fetch_and_attach(
            &feed,
            &schedule(),
            &store,
            &AppConfig::default(),
            date("2026-02-06"),
        )
        .await
        .unwrap();

        assert_eq!(report.month, month("2026-01"));
        assert_eq!(report.outcome, AttachOutcome::Attached);
        let history = store.load_releases().unwrap();
        let moves = history[&month("2026-01")].price_moves.as_ref().unwrap();
        assert_eq!(moves.release_price, dec("151.00"));
        assert_eq!(moves.moves["5min_after"].pips, dec("50.0"));
    }

    #[tokio::test]
    async fn test_fetch_and_attach_unscheduled_date_falls_back_to_prev_month() {
        let (_dir, store) = store_with(&["2026-02"]);
        let feed = feed_with(&[("2026-03-13 13:30:00", "150.00")]);

        let report = fetch_and_attach(
            &feed,
            &schedule(),
            &store,
            &AppConfig::default(),
            date("2026-03-13"),
        )
        .await
        .unwrap();

        assert_eq!(report.month, month("2026-02"));
        assert_eq!(report.outcome, AttachOutcome::Attached);
    }

    #[tokio::test]
    async fn test_fetch_and_attach_missing_release_persists_nothing() {
        let (_dir, store) = store_with(&["2026-01"]);
        // Series has data, but not at the 13:30 release timestamp
        let feed = feed_with(&[("2026-02-06 14:00:00", "151.00")]);

        let result = fetch_and_attach(
            &feed,
            &schedule(),
            &store,
            &AppConfig::default(),
            date("2026-02-06"),
        )
        .await;

        assert!(matches!(
            result,
            Err(AppError::DataUnavailable(MoveError::DataUnavailable(_)))
        ));
        let history = store.load_releases().unwrap();
        assert!(history[&month("2026-01")].price_moves.is_none());
    }

    #[tokio::test]
    async fn test_fetch_and_attach_unknown_month_reports_without_persisting() {
        let (_dir, store) = store_with(&[]);
        let feed = feed_with(&[("2026-02-06 13:30:00", "151.00")]);

        let report = fetch_and_attach(
            &feed,
            &schedule(),
            &store,
            &AppConfig::default(),
            date("2026-02-06"),
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, AttachOutcome::UnknownMonth);
        assert!(store.load_releases().unwrap().is_empty());
    }

    // =========================================================================
    // populate_from_file
    // =========================================================================

    const DATASET_YAML: &str = r#"
"2024-01":
  release_price: 144.80
  moves:
    5min_after: { price: 145.30, pips: 50 }
    30min_after: { price: 145.60, pips: 80 }
  max_move: 80
"2024-02":
  release_price: 148.20
  moves:
    5min_after: { price: 148.90, pips: 70 }
  max_move: 70
"#;

    #[test]
    fn test_populate_attaches_known_months_and_skips_others() {
        let (_dir, store) = store_with(&["2024-01"]);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DATASET_YAML.as_bytes()).unwrap();
        file.flush().unwrap();

        let report = populate_from_file(&store, file.path()).unwrap();

        assert_eq!(report.attached, vec![month("2024-01")]);
        assert_eq!(report.skipped, vec![month("2024-02")]);
        let history = store.load_releases().unwrap();
        let moves = history[&month("2024-01")].price_moves.as_ref().unwrap();
        assert_eq!(moves.max_move, Some(dec("80")));
    }

    #[test]
    fn test_populate_missing_file_is_config_error() {
        let (_dir, store) = store_with(&[]);
        let result = populate_from_file(&store, Path::new("/nonexistent/moves.yaml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    // =========================================================================
    // manual_attach
    // =========================================================================

    #[test]
    fn test_manual_attach_computes_pips_and_max() {
        let (_dir, store) = store_with(&["2024-08"]);

        let (outcome, result) = manual_attach(
            &store,
            month("2024-08"),
            dec("146.50"),
            &[
                ("5min_after".to_string(), dec("145.80")),
                ("30min_after".to_string(), dec("145.20")),
            ],
            dec("100"),
        )
        .unwrap();

        assert_eq!(outcome, AttachOutcome::Attached);
        assert_eq!(result.moves["5min_after"].pips, dec("-70.0"));
        assert_eq!(result.moves["30min_after"].pips, dec("-130.0"));
        assert_eq!(result.max_move, Some(dec("-130.0")));
        let history = store.load_releases().unwrap();
        assert!(history[&month("2024-08")].price_moves.is_some());
    }

    #[test]
    fn test_manual_attach_unknown_month_persists_nothing() {
        let (_dir, store) = store_with(&[]);

        let (outcome, _) = manual_attach(
            &store,
            month("2024-08"),
            dec("146.50"),
            &[("5min_after".to_string(), dec("145.80"))],
            dec("100"),
        )
        .unwrap();

        assert_eq!(outcome, AttachOutcome::UnknownMonth);
        assert!(store.load_releases().unwrap().is_empty());
    }
}
