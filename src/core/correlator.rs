//! Speech-to-release window correlation
//!
//! Attributes central-bank commentary to the jobs report it most likely
//! influenced: everything said between two consecutive release dates
//! belongs to the later release's window.

use super::schedule::{ReferenceMonth, Schedule};
use super::speeches::SpeechEntry;

/// Commentary entries inside the release window ending at `target`'s
/// release date
///
/// The window is `[D_prev, D_curr]`, both bounds inclusive, where `D_curr`
/// is the release date of the jobs report covering `target` and `D_prev`
/// the release date of the positionally preceding report. Entries keep the
/// log's original relative order.
///
/// Returns an empty list when `target` is not on the schedule, or when it
/// is the first scheduled report (no preceding window exists).
pub fn find_related<'a>(
    schedule: &Schedule,
    speeches: &'a [SpeechEntry],
    target: ReferenceMonth,
) -> Vec<&'a SpeechEntry> {
    let Some((position, current)) = schedule.jobs_report_for(target) else {
        return Vec::new();
    };
    if position == 0 {
        return Vec::new();
    }
    let previous = schedule.jobs_reports()[position - 1];

    speeches
        .iter()
        .filter(|s| s.date >= previous.date && s.date <= current.date)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
