//! Run orchestration over a full reporting span.

use ct_metrics_core::{MetricMode, TimeRange, generate_intervals, to_iso};
use serde::Serialize;
use tracing::{info, instrument};

use crate::ReportError;
use crate::adaptive::execute_metric;
use crate::strategies::MetricEvaluator;

/// Outcome of a completed run, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mode: MetricMode,
    pub from: String,
    pub to: String,
    pub total: u64,
}

impl RunSummary {
    #[must_use]
    pub fn new(mode: MetricMode, span: TimeRange, total: u64) -> Self {
        Self {
            mode,
            from: to_iso(span.from()),
            to: to_iso(span.to()),
            total,
        }
    }
}

/// Compute the grand total for `mode` over `span`.
///
/// Interval-splittable modes are cut into fixed steps (one hour for carts,
/// four for first-time buyers) and every interval goes through
/// [`execute_metric`] in order, one at a time. Full-range-only modes are
/// evaluated once over the whole span with no threshold check.
///
/// # Errors
///
/// Returns the first error encountered; remaining intervals are not run.
#[instrument(skip(source, span), fields(mode = %mode, span = %span))]
pub async fn run_metric<S: MetricEvaluator>(
    source: &S,
    mode: MetricMode,
    span: TimeRange,
) -> Result<u64, ReportError> {
    let Some(step_hours) = mode.interval_step_hours() else {
        let total = source.evaluate(mode, span).await?;
        info!(total, "Full range total");
        return Ok(total);
    };

    let intervals = generate_intervals(span, step_hours)?;
    info!(intervals = intervals.len(), step_hours, "Running interval metric");

    let mut total: u64 = 0;
    for interval in intervals {
        let interval_total = execute_metric(source, mode, interval).await?;
        total = total.saturating_add(interval_total);
        info!(interval = %interval, total = interval_total, "Interval total");
    }
    Ok(total)
}
