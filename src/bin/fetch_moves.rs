//! Post-release price-move fetch tool
//!
//! Three operations against the release history:
//! - `populate` - bulk-attach the curated historical-move dataset
//! - `fetch DATE [API_KEY]` - pull the intraday feed, compute moves at the
//!   configured release time and attach them
//! - `add MONTH PRICE LABEL=PRICE...` - supply per-offset prices manually
//!   (feed request budgets are tight on the free tier)
//!
//! Exit status reflects overall success for automation use.

use std::str::FromStr;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use macro_desk::adapters::{AlphaVantageClient, AlphaVantageConfig};
use macro_desk::config::{self, constants, AppConfig};
use macro_desk::core::{
    fetch_and_attach, manual_attach, populate_from_file, AttachOutcome, PriceMoveResult,
    ReferenceMonth, Schedule,
};
use macro_desk::store::DataStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();
    config::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let app_config = config::load_config(&constants::config_path())?;
    let store = DataStore::new(&app_config.storage.data_dir);

    match command.as_str() {
        "populate" => {
            let report = populate_from_file(&store, &app_config.resources.historical_moves_file)?;
            for month in &report.attached {
                println!("Attached: {}", month);
            }
            for month in &report.skipped {
                println!("Skipped (no history record): {}", month);
            }
            println!(
                "Populate complete: {} attached, {} skipped.",
                report.attached.len(),
                report.skipped.len()
            );
        }
        "fetch" => {
            // fetch DATE [API_KEY]
            let Some(raw_date) = args.get(1) else {
                bail!("usage: fetch_moves fetch DATE [API_KEY]");
            };
            let release_date: NaiveDate = raw_date
                .parse()
                .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw_date))?;

            let mut feed_config = AlphaVantageConfig::from_env();
            if let Some(key) = args.get(2) {
                feed_config = feed_config.with_key(key);
            }
            let feed = AlphaVantageClient::new(feed_config)?;

            let schedule = Schedule::from_yaml_file(&app_config.resources.schedule_file)?;
            println!("Fetching price moves for {}...", release_date);
            let report =
                fetch_and_attach(&feed, &schedule, &store, &app_config, release_date).await?;

            print_moves(&report.moves, &app_config);
            match report.outcome {
                AttachOutcome::Attached => println!("Updated: {}", report.month),
                AttachOutcome::UnknownMonth => {
                    bail!(
                        "month {} has no release record; record the outcome first with \
                         'macro_desk set-release'",
                        report.month
                    );
                }
            }
        }
        "add" => {
            // add MONTH RELEASE_PRICE LABEL=PRICE [LABEL=PRICE...]
            if args.len() < 4 {
                bail!("usage: fetch_moves add MONTH RELEASE_PRICE LABEL=PRICE [LABEL=PRICE...]");
            }
            let month: ReferenceMonth = args[1].parse()?;
            let release_price = Decimal::from_str(&args[2])
                .with_context(|| format!("invalid release price '{}'", args[2]))?;
            let offset_prices = parse_offset_prices(&args[3..])?;

            let (outcome, result) = manual_attach(
                &store,
                month,
                release_price,
                &offset_prices,
                app_config.instrument.pip_scale,
            )?;

            print_moves(&result, &app_config);
            match outcome {
                AttachOutcome::Attached => println!("Updated: {}", month),
                AttachOutcome::UnknownMonth => {
                    bail!("month {} has no release record; nothing saved", month);
                }
            }
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_usage() {
    println!("usage:");
    println!("  fetch_moves populate                              Bulk-attach known historical moves");
    println!("  fetch_moves fetch DATE [API_KEY]                  Fetch and compute for one release date");
    println!("  fetch_moves add MONTH PRICE LABEL=PRICE [...]     Supply per-offset prices manually");
    println!();
    println!("examples:");
    println!("  fetch_moves populate");
    println!("  fetch_moves fetch 2026-02-06");
    println!("  fetch_moves add 2024-08 146.50 5min_after=145.80 30min_after=145.20");
}

fn parse_offset_prices(raw: &[String]) -> anyhow::Result<Vec<(String, Decimal)>> {
    raw.iter()
        .map(|pair| {
            let (label, price) = pair
                .split_once('=')
                .with_context(|| format!("expected LABEL=PRICE, got '{}'", pair))?;
            let price = Decimal::from_str(price)
                .with_context(|| format!("invalid price in '{}'", pair))?;
            Ok((label.to_string(), price))
        })
        .collect()
}

fn print_moves(moves: &PriceMoveResult, app_config: &AppConfig) {
    println!("  release price: {}", moves.release_price);
    // Print in the configured offset order, resolved entries only
    for offset in &app_config.offsets {
        if let Some(m) = moves.moves.get(&offset.label) {
            println!("  {:<12} {}  ({} pips)", offset.label, m.price, fmt_signed(m.pips));
        }
    }
    // Manually supplied labels outside the configured table still print
    for (label, m) in &moves.moves {
        if !app_config.offsets.iter().any(|o| &o.label == label) {
            println!("  {:<12} {}  ({} pips)", label, m.price, fmt_signed(m.pips));
        }
    }
    match moves.max_move {
        Some(max) => println!("  max move: {} pips", fmt_signed(max)),
        None => println!("  no offsets resolved (sparse feed?)"),
    }
}

fn fmt_signed(value: Decimal) -> String {
    if value.is_sign_negative() {
        value.to_string()
    } else {
        format!("+{}", value)
    }
}
