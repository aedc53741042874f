//! Fixed-step interval generation.

use chrono::TimeDelta;

use crate::types::{RangeError, TimeRange};

/// Cut `span` into consecutive `step_hours`-long intervals.
///
/// Intervals start at `span.from()` and are emitted until the cursor reaches
/// `span.to()`. The last interval is not clamped: when the span is not a
/// whole number of steps it ends past `span.to()` by less than one step, and
/// downstream totals are defined over the emitted interval.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ct_metrics_core::{TimeRange, generate_intervals};
///
/// let span = TimeRange::new(
///     Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2026, 1, 1, 2, 30, 0).unwrap(),
/// )
/// .unwrap();
///
/// let intervals = generate_intervals(span, 1).unwrap();
/// assert_eq!(intervals.len(), 3);
/// assert_eq!(
///     intervals[2].to(),
///     Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap()
/// );
/// ```
///
/// # Errors
///
/// Returns [`RangeError::ZeroStep`] if `step_hours` is zero.
pub fn generate_intervals(span: TimeRange, step_hours: u32) -> Result<Vec<TimeRange>, RangeError> {
    if step_hours == 0 {
        return Err(RangeError::ZeroStep);
    }
    let step = TimeDelta::hours(i64::from(step_hours));

    let mut intervals = Vec::new();
    let mut cursor = span.from();
    while cursor < span.to() {
        let next = cursor + step;
        intervals.push(TimeRange::new(cursor, next)?);
        cursor = next;
    }
    Ok(intervals)
}
