//! Economic-calendar dashboard entry point
//!
//! Renders the calendar, monthly jobs-report detail, speech log and trade
//! log as terminal output, and records user-supplied entries into the
//! JSON stores. Views are composed by the library; this binary only
//! parses arguments and prints.

use std::str::FromStr;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use macro_desk::config::{self, constants};
use macro_desk::core::{
    calendar_view, default_month, latest_first, month_view, trade_stats, CalendarView, EventKind,
    MonthView, OfficialRoster, ReferenceMonth, ReleaseRecord, Schedule, SpeechEntry, Stance,
    TradeRecord,
};
use macro_desk::store::DataStore;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();
    config::init_logging();

    let config = config::load_config(&constants::config_path())?;
    let schedule = Schedule::from_yaml_file(&config.resources.schedule_file)?;
    let store = DataStore::new(&config.storage.data_dir);
    let today = Local::now().date_naive();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("calendar");

    match command {
        "calendar" => {
            let view = calendar_view(&schedule, today);
            print_calendar(&view);
        }
        "month" => {
            let month = match args.get(1) {
                Some(raw) => raw.parse::<ReferenceMonth>()?,
                None => default_month(&schedule, today)
                    .context("no jobs report scheduled on or after today; pass a month")?,
            };
            let history = store.load_releases()?;
            let speeches = store.load_speeches()?;
            let view = month_view(&schedule, &history, &speeches, month);
            print_month(&view);
        }
        "speeches" => {
            let roster = OfficialRoster::from_yaml_file(&config.resources.officials_file)?;
            let speeches = store.load_speeches()?;
            print_speeches(&speeches, &roster);
        }
        "trades" => {
            let trades = store.load_trades()?;
            print_trades(&trades);
        }
        "add-speech" => {
            // add-speech DATE OFFICIAL STANCE SUMMARY [REACTION]
            if args.len() < 5 {
                bail!("usage: macro_desk add-speech DATE OFFICIAL STANCE SUMMARY [REACTION]");
            }
            let entry = SpeechEntry {
                date: parse_date(&args[1])?,
                official: args[2].clone(),
                stance: args[3].parse::<Stance>()?,
                summary: args[4].clone(),
                market_reaction: args.get(5).cloned().unwrap_or_default(),
            };
            store.append_speech(entry)?;
            println!("Speech recorded.");
        }
        "add-trade" => {
            // add-trade DATE INDICATOR ENTRY EXIT PNL [NOTES]
            if args.len() < 6 {
                bail!("usage: macro_desk add-trade DATE INDICATOR ENTRY EXIT PNL [NOTES]");
            }
            let record = TradeRecord::new(
                parse_date(&args[1])?,
                args[2].clone(),
                parse_decimal(&args[3])?,
                parse_decimal(&args[4])?,
                parse_decimal(&args[5])?,
                args.get(6).cloned().unwrap_or_default(),
            );
            store.append_trade(record)?;
            println!("Trade recorded.");
        }
        "set-release" => {
            // set-release MONTH FORECAST ACTUAL PREVIOUS [REACTION] [NOTES]
            // "-" leaves a field empty
            if args.len() < 5 {
                bail!(
                    "usage: macro_desk set-release MONTH FORECAST ACTUAL PREVIOUS [REACTION] [NOTES]"
                );
            }
            let month = args[1].parse::<ReferenceMonth>()?;
            let record = ReleaseRecord {
                forecast: parse_optional_decimal(&args[2])?,
                actual: parse_optional_decimal(&args[3])?,
                previous: parse_optional_decimal(&args[4])?,
                market_reaction: args.get(5).filter(|s| *s != "-").cloned(),
                notes: args.get(6).filter(|s| *s != "-").cloned().unwrap_or_default(),
                // Recomputed by the fetch tool; a manual edit drops stale moves
                price_moves: None,
            };
            store.update_release(month, record)?;
            println!("Release record for {} saved.", month);
        }
        "help" | "--help" | "-h" => print_usage(),
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
    println!("  macro_desk [calendar]                                    Upcoming events");
    println!("  macro_desk month [YYYY-MM]                               Jobs-report detail");
    println!("  macro_desk speeches                                      Speech log");
    println!("  macro_desk trades                                        Trade log and stats");
    println!("  macro_desk add-speech DATE OFFICIAL STANCE SUMMARY [RX]  Record a speech");
    println!("  macro_desk add-trade DATE IND ENTRY EXIT PNL [NOTES]     Record a trade");
    println!("  macro_desk set-release MONTH FC ACT PREV [RX] [NOTES]    Record an outcome");
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    raw.parse()
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_decimal(raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw).with_context(|| format!("invalid number '{}'", raw))
}

fn parse_optional_decimal(raw: &str) -> anyhow::Result<Option<Decimal>> {
    if raw == "-" {
        Ok(None)
    } else {
        parse_decimal(raw).map(Some)
    }
}

fn fmt_signed(value: Decimal) -> String {
    if value.is_sign_negative() {
        value.to_string()
    } else {
        format!("+{}", value)
    }
}

fn event_note(kind: &EventKind) -> String {
    match kind {
        EventKind::RateDecision { projections: true, .. } => "with projections".to_string(),
        EventKind::RateDecision { projections: false, .. } => String::new(),
        EventKind::JobsReport { reference_month } | EventKind::InflationReport { reference_month } => {
            format!("covers {}", reference_month)
        }
    }
}

fn print_calendar(view: &CalendarView<'_>) {
    println!("=== Economic Calendar ===");
    println!("Today: {}", view.today);
    match &view.next_jobs_report {
        Some(next) => println!(
            "Next jobs report: {} (covers {}), in {} day(s)",
            next.date, next.reference_month, next.days_until
        ),
        None => println!("Next jobs report: none scheduled this year"),
    }
    println!();
    if view.events.is_empty() {
        println!("No events in the current or next month.");
    }
    for event in &view.events {
        println!("  {}  {:<5} {}", event.date, event.kind.code(), event_note(&event.kind));
    }
}

fn print_month(view: &MonthView<'_>) {
    println!("=== Jobs Report: {} ===", view.month);
    match view.release_date {
        Some(date) => println!("Release date: {}", date),
        None => println!("Release date: not on this year's schedule"),
    }
    if let Some(prev) = view.previous_release_date {
        println!("Previous release: {}", prev);
    }

    println!();
    let fmt = |v: &Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    println!("Forecast: {}k  Actual: {}k  Previous: {}k",
        fmt(&view.record.forecast), fmt(&view.record.actual), fmt(&view.record.previous));
    if let Some(reaction) = &view.record.market_reaction {
        println!("Market reaction: {}", reaction);
    }
    if !view.record.notes.is_empty() {
        println!("Notes: {}", view.record.notes);
    }

    if let Some(moves) = &view.record.price_moves {
        println!();
        println!("Price moves (release close {}):", moves.release_price);
        for (label, m) in &moves.moves {
            println!("  {:<12} {}  ({} pips)", label, m.price, fmt_signed(m.pips));
        }
        if let Some(max) = moves.max_move {
            println!("  max move: {} pips", fmt_signed(max));
        }
    }

    if !view.related_speeches.is_empty() {
        println!();
        println!("Speeches in the release window:");
        for speech in &view.related_speeches {
            println!("  {}  {:<10} [{}] {}", speech.date, speech.official, speech.stance, speech.summary);
        }
    }

    println!();
    println!("All releases:");
    for report in view.all_reports {
        let marker = if report.reference_month == view.month { "*" } else { " " };
        println!(" {} {}  covers {}", marker, report.date, report.reference_month);
    }
}

fn print_speeches(log: &[SpeechEntry], roster: &OfficialRoster) {
    println!("=== Speech Log ===");
    if log.is_empty() {
        println!("No speeches recorded.");
        return;
    }
    for speech in latest_first(log) {
        let (name, stars) = match roster.get(&speech.official) {
            Some(official) => (official.name.clone(), official.stars()),
            None => (speech.official.clone(), "☆☆☆".to_string()),
        };
        println!("  {}  {} {}  [{}]", speech.date, stars, name, speech.stance);
        println!("      {}", speech.summary);
        if !speech.market_reaction.is_empty() {
            println!("      reaction: {}", speech.market_reaction);
        }
    }
}

fn print_trades(trades: &[TradeRecord]) {
    println!("=== Trade Log ===");
    if trades.is_empty() {
        println!("No trades recorded.");
        return;
    }
    for trade in trades {
        println!(
            "  {}  {:<6} entry {} exit {}  pnl {}  {}",
            trade.date, trade.indicator, trade.entry, trade.exit, fmt_signed(trade.pnl), trade.notes
        );
    }

    let stats = trade_stats(trades);
    println!();
    println!(
        "Total P&L: {}  ({} trades, {} wins / {} losses, win rate {:.1}%)",
        fmt_signed(stats.total_pnl),
        stats.trade_count,
        stats.win_count,
        stats.loss_count,
        stats.win_rate
    );
    println!("Cumulative:");
    for point in &stats.cumulative {
        println!("  {}  {}", point.date, fmt_signed(point.total));
    }
}
