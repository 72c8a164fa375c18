//! Core module - schedule registry, window correlation, price-move
//! calculation, stores' record types and view composition
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) to provide better API visibility and prevent
//! accidental public API changes.

pub mod correlator;
pub mod moves;
pub mod releases;
pub mod schedule;
pub mod speeches;
pub mod trades;
pub mod updater;
pub mod views;

// Explicit re-exports for schedule module
pub use schedule::{
    CentralBank, EventKind, JobsReport, ReferenceMonth, Schedule, ScheduleEntry,
};

// Explicit re-exports for correlator module
pub use correlator::find_related;

// Explicit re-exports for moves module
pub use moves::{compute_moves, select_max_move, MoveError, MoveOffset, PriceMove, PriceMoveResult};

// Explicit re-exports for releases module
pub use releases::{attach_moves, AttachOutcome, ReleaseHistory, ReleaseRecord};

// Explicit re-exports for speeches module
pub use speeches::{latest_first, Official, OfficialRoster, SpeechEntry, Stance};

// Explicit re-exports for trades module
pub use trades::{trade_stats, CumulativePoint, TradeRecord, TradeStats};

// Explicit re-exports for views module
pub use views::{calendar_view, default_month, month_view, CalendarView, MonthView, UpcomingRelease};

// Explicit re-exports for updater module
pub use updater::{fetch_and_attach, manual_attach, populate_from_file, FetchReport, PopulateReport};
