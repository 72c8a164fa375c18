//! Display-ready view composition
//!
//! Thin aggregation over the registry, correlator and stores. No
//! rendering here; the binaries own the presentation.

use chrono::NaiveDate;

use super::correlator::find_related;
use super::releases::{ReleaseHistory, ReleaseRecord};
use super::schedule::{JobsReport, ReferenceMonth, Schedule, ScheduleEntry};
use super::speeches::SpeechEntry;

/// The next scheduled jobs report relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingRelease {
    pub date: NaiveDate,
    pub reference_month: ReferenceMonth,
    pub days_until: i64,
}

/// Front-page calendar summary
#[derive(Debug, Clone)]
pub struct CalendarView<'a> {
    pub today: NaiveDate,
    pub next_jobs_report: Option<UpcomingRelease>,
    /// Events of the current and following month, in date order
    pub events: Vec<&'a ScheduleEntry>,
}

/// Build the calendar view for `today`
pub fn calendar_view(schedule: &Schedule, today: NaiveDate) -> CalendarView<'_> {
    let next_jobs_report = schedule.next_jobs_report(today).map(|r| UpcomingRelease {
        date: r.date,
        reference_month: r.reference_month,
        days_until: (r.date - today).num_days(),
    });

    let this_month = ReferenceMonth::from_date(today);
    let events = schedule.entries_in_months(&[this_month, this_month.next()]);

    CalendarView {
        today,
        next_jobs_report,
        events,
    }
}

/// Monthly jobs-report detail
#[derive(Debug, Clone)]
pub struct MonthView<'a> {
    pub month: ReferenceMonth,
    /// Release date for the month, when it is on the schedule
    pub release_date: Option<NaiveDate>,
    /// Release date of the positionally preceding report
    pub previous_release_date: Option<NaiveDate>,
    /// Recorded outcome; default-empty when nothing recorded yet
    pub record: ReleaseRecord,
    /// Commentary inside the `[previous, current]` release window
    pub related_speeches: Vec<&'a SpeechEntry>,
    /// Every scheduled jobs report, for month navigation
    pub all_reports: &'a [JobsReport],
}

/// Build the detail view for one reference month
///
/// Unknown months produce a view with no release date, a default record
/// and no related speeches, never an error.
pub fn month_view<'a>(
    schedule: &'a Schedule,
    history: &ReleaseHistory,
    speeches: &'a [SpeechEntry],
    month: ReferenceMonth,
) -> MonthView<'a> {
    let located = schedule.jobs_report_for(month);
    let release_date = located.map(|(_, r)| r.date);
    let previous_release_date = located.and_then(|(position, _)| {
        position
            .checked_sub(1)
            .map(|i| schedule.jobs_reports()[i].date)
    });

    MonthView {
        month,
        release_date,
        previous_release_date,
        record: history.get(&month).cloned().unwrap_or_default(),
        related_speeches: find_related(schedule, speeches, month),
        all_reports: schedule.jobs_reports(),
    }
}

/// Month shown when the user doesn't name one: the next scheduled report's
pub fn default_month(schedule: &Schedule, today: NaiveDate) -> Option<ReferenceMonth> {
    schedule.next_jobs_report(today).map(|r| r.reference_month)
}

// ============================================================================
// Tests
// ============================================================================
