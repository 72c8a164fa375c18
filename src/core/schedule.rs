//! Fixed yearly economic-event schedule
//!
//! The schedule is immutable data loaded once at startup from a YAML
//! resource (see `data/schedule_2026.yaml`). The file groups entries the
//! way the source calendars publish them (rate decisions per central bank,
//! jobs reports, inflation prints); in memory they are flattened into one
//! chronological list plus an indexed jobs-report table for window lookups.
//!
//! Invariant: within each calendar (Fed meetings, BoJ meetings, jobs
//! reports, inflation prints) dates are strictly increasing. The loader
//! rejects files that violate this.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::error::AppError;

// ============================================================================
// ReferenceMonth
// ============================================================================

/// Error for unparseable reference-month strings
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid reference month '{0}', expected YYYY-MM")]
pub struct ParseReferenceMonthError(String);

/// Calendar month a release describes, displayed and stored as `YYYY-MM`
///
/// Jobs reports describe the month before their release date, so this is
/// the key of the release-history store and the argument of every
/// month-scoped query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceMonth {
    year: i32,
    month: u32,
}

impl ReferenceMonth {
    /// Build a reference month; `None` unless 1 <= month <= 12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Preceding calendar month (2026-01 -> 2025-12)
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Following calendar month (2025-12 -> 2026-01)
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Whether `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReferenceMonth {
    type Err = ParseReferenceMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseReferenceMonthError(s.to_string());
        let (year_str, month_str) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year_str.parse().map_err(|_| err())?;
        if month_str.len() != 2 {
            return Err(err());
        }
        let month: u32 = month_str.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl Serialize for ReferenceMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReferenceMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// Central banks on the rate-decision calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralBank {
    Fed,
    Boj,
}

impl fmt::Display for CentralBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentralBank::Fed => write!(f, "fed"),
            CentralBank::Boj => write!(f, "boj"),
        }
    }
}

/// Type-specific payload of a schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Central-bank policy meeting; `projections` marks meetings that also
    /// publish an economic outlook (Fed SEP / BoJ Outlook Report)
    RateDecision {
        bank: CentralBank,
        projections: bool,
    },
    /// Monthly employment release covering `reference_month`
    JobsReport { reference_month: ReferenceMonth },
    /// Monthly inflation print covering `reference_month`
    InflationReport { reference_month: ReferenceMonth },
}

impl EventKind {
    /// Short display code used by the calendar view
    pub fn code(&self) -> &'static str {
        match self {
            EventKind::RateDecision { bank: CentralBank::Fed, .. } => "FOMC",
            EventKind::RateDecision { bank: CentralBank::Boj, .. } => "BOJ",
            EventKind::JobsReport { .. } => "NFP",
            EventKind::InflationReport { .. } => "CPI",
        }
    }
}

/// One dated entry of the yearly schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub kind: EventKind,
}

/// A jobs-report release: the date it prints and the month it describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobsReport {
    pub date: NaiveDate,
    pub reference_month: ReferenceMonth,
}

// ============================================================================
// Schedule file format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RateDecisionRow {
    date: NaiveDate,
    bank: CentralBank,
    #[serde(default)]
    projections: bool,
}

#[derive(Debug, Deserialize)]
struct ReportRow {
    date: NaiveDate,
    reference_month: ReferenceMonth,
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    rate_decisions: Vec<RateDecisionRow>,
    #[serde(default)]
    jobs_reports: Vec<ReportRow>,
    #[serde(default)]
    inflation_reports: Vec<ReportRow>,
}

// ============================================================================
// Schedule
// ============================================================================

/// Immutable registry of the year's scheduled events
#[derive(Debug, Clone)]
pub struct Schedule {
    /// All entries, sorted by date
    entries: Vec<ScheduleEntry>,
    /// Jobs reports in release order, indexed for window lookups
    jobs: Vec<JobsReport>,
}

impl Schedule {
    /// Load and validate a schedule from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::Schedule(format!(
                "Schedule file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            AppError::Schedule(msg) => {
                AppError::Schedule(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load and validate a schedule from a YAML string
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, AppError> {
        let file: ScheduleFile = serde_yaml::from_str(yaml_content)
            .map_err(|e| AppError::Schedule(format!("YAML parse error: {}", e)))?;
        Self::from_parts(file)
    }

    fn from_parts(file: ScheduleFile) -> Result<Self, AppError> {
        // Per-calendar strictly-increasing date checks, one source table at
        // a time, mirroring how the file groups entries.
        for bank in [CentralBank::Fed, CentralBank::Boj] {
            let dates: Vec<NaiveDate> = file
                .rate_decisions
                .iter()
                .filter(|r| r.bank == bank)
                .map(|r| r.date)
                .collect();
            check_strictly_increasing(&dates, &format!("{} rate decisions", bank))?;
        }
        let jobs_dates: Vec<NaiveDate> = file.jobs_reports.iter().map(|r| r.date).collect();
        check_strictly_increasing(&jobs_dates, "jobs reports")?;
        let cpi_dates: Vec<NaiveDate> = file.inflation_reports.iter().map(|r| r.date).collect();
        check_strictly_increasing(&cpi_dates, "inflation reports")?;

        // Jobs reference months must also be strictly increasing so each
        // month keys exactly one release.
        let months: Vec<ReferenceMonth> = file
            .jobs_reports
            .iter()
            .map(|r| r.reference_month)
            .collect();
        for pair in months.windows(2) {
            if pair[1] <= pair[0] {
                return Err(AppError::Schedule(format!(
                    "jobs reports: reference months not strictly increasing ({} then {})",
                    pair[0], pair[1]
                )));
            }
        }

        let jobs: Vec<JobsReport> = file
            .jobs_reports
            .iter()
            .map(|r| JobsReport {
                date: r.date,
                reference_month: r.reference_month,
            })
            .collect();

        let mut entries: Vec<ScheduleEntry> = Vec::new();
        entries.extend(file.rate_decisions.iter().map(|r| ScheduleEntry {
            date: r.date,
            kind: EventKind::RateDecision {
                bank: r.bank,
                projections: r.projections,
            },
        }));
        entries.extend(file.jobs_reports.iter().map(|r| ScheduleEntry {
            date: r.date,
            kind: EventKind::JobsReport {
                reference_month: r.reference_month,
            },
        }));
        entries.extend(file.inflation_reports.iter().map(|r| ScheduleEntry {
            date: r.date,
            kind: EventKind::InflationReport {
                reference_month: r.reference_month,
            },
        }));
        entries.sort_by_key(|e| e.date);

        Ok(Self { entries, jobs })
    }

    /// All entries in date order
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Jobs reports in release order
    pub fn jobs_reports(&self) -> &[JobsReport] {
        &self.jobs
    }

    /// The jobs report covering `month`, with its position in release order
    pub fn jobs_report_for(&self, month: ReferenceMonth) -> Option<(usize, JobsReport)> {
        self.jobs
            .iter()
            .position(|r| r.reference_month == month)
            .map(|i| (i, self.jobs[i]))
    }

    /// First jobs report dated on or after `today`
    pub fn next_jobs_report(&self, today: NaiveDate) -> Option<&JobsReport> {
        self.jobs.iter().find(|r| r.date >= today)
    }

    /// Reference month of the jobs report released on `date`, if any
    pub fn reference_month_for_date(&self, date: NaiveDate) -> Option<ReferenceMonth> {
        self.jobs
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.reference_month)
    }

    /// Entries whose date falls in any of `months`, in date order
    pub fn entries_in_months(&self, months: &[ReferenceMonth]) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| months.iter().any(|m| m.contains(e.date)))
            .collect()
    }
}

fn check_strictly_increasing(dates: &[NaiveDate], what: &str) -> Result<(), AppError> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(AppError::Schedule(format!(
                "{}: dates not strictly increasing ({} then {})",
                what, pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
