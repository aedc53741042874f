//! Threshold-driven interval splitting.
//!
//! commercetools caps the totals it will compute for a single query. When a
//! range reports at least [`SPLIT_THRESHOLD`] matches, the range is cut at
//! a fixed offset from its start and both parts are counted concurrently.
//! The split is single-level: the halves are evaluated directly and their
//! totals are taken as-is even if one of them is still over the threshold.

use chrono::TimeDelta;
use ct_metrics_core::{MetricMode, TimeRange};
use tracing::{info, instrument};

use crate::ReportError;
use crate::strategies::MetricEvaluator;

/// Totals at or above this value trigger a split.
pub const SPLIT_THRESHOLD: u64 = 10_000;

/// Offset of the split point from the range start, in minutes.
pub const SPLIT_OFFSET_MINUTES: i64 = 30;

/// Count `mode` over `range`, splitting once if the total hits the threshold.
///
/// The split point is always `range.from() + 30 minutes`, whatever the
/// length of the range.
///
/// # Errors
///
/// Returns `ReportError::UnsupportedMode` for full-range-only modes, and
/// otherwise the first strategy failure. No partial sum is returned.
///
/// Returns `ReportError::Range` when a range of 30 minutes or less hits the
/// threshold. The fixed split point then lies on or past the range end, so
/// neither half is queried; an inverted second half would be sent to the
/// API otherwise. Ranges built by [`run_metric`](crate::run_metric) are
/// always at least one hour long and never take this path.
#[instrument(skip(source, range), fields(mode = %mode, range = %range))]
pub async fn execute_metric<S: MetricEvaluator>(
    source: &S,
    mode: MetricMode,
    range: TimeRange,
) -> Result<u64, ReportError> {
    if !mode.is_interval_splittable() {
        return Err(ReportError::UnsupportedMode(mode.to_string()));
    }

    let total = source.evaluate(mode, range).await?;
    if total < SPLIT_THRESHOLD {
        return Ok(total);
    }

    info!(total, "Total exceeds {SPLIT_THRESHOLD}, splitting into 30-min intervals");

    let midpoint = range.from() + TimeDelta::minutes(SPLIT_OFFSET_MINUTES);
    let (first, second) = range.split_at(midpoint)?;

    let (first_total, second_total) = tokio::try_join!(
        source.evaluate(mode, first),
        source.evaluate(mode, second)
    )?;
    let combined = first_total.saturating_add(second_total);

    info!(
        first = first_total,
        second = second_total,
        combined,
        "30-min intervals combined"
    );
    Ok(combined)
}
