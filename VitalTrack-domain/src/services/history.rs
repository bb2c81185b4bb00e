//! Date-range filtering and ordering shared by the history view, the report
//! builder and the dashboard.

use std::cmp::Ordering;

use crate::entities::reading::Reading;
use crate::entities::report::SortOrder;

/// Treat an empty bound the same as a missing one
fn bound(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Readings whose `date` lies within `[start, end]`.
///
/// Comparison is lexicographic on `YYYY-MM-DD`, which matches chronological
/// order for well-formed dates. Either bound may be absent or empty. The
/// result keeps the input order; use [`sort_readings`] to order it.
pub fn filter_by_date_range(
    readings: &[Reading],
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<Reading> {
    let start = bound(start);
    let end = bound(end);

    readings
        .iter()
        .filter(|reading| start.map_or(true, |s| reading.date.as_str() >= s))
        .filter(|reading| end.map_or(true, |e| reading.date.as_str() <= e))
        .cloned()
        .collect()
}

fn chronological(a: &Reading, b: &Reading) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.time.cmp(&b.time))
        .then_with(|| a.id.cmp(&b.id))
}

/// Order readings by date, then time, then id
pub fn sort_readings(readings: &mut [Reading], order: SortOrder) {
    match order {
        SortOrder::Asc => readings.sort_by(chronological),
        SortOrder::Desc => readings.sort_by(|a, b| chronological(b, a)),
    }
}
