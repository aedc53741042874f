//! Report command: compute one metric total over a date range.
//!
//! # Usage
//!
//! ```bash
//! ct-metrics run --mode CART_TOTAL
//! MODE=TOTAL_CUSTOMERS ct-metrics run --format json
//! ```
//!
//! # Environment Variables
//!
//! - `CT_*` - commercetools connection settings
//! - `MODE`, `REPORT_FROM`, `REPORT_TO` - defaults for the command arguments

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use ct_metrics_core::{MetricMode, TimeRange};
use ct_metrics_reporter::commercetools::client::build_http_client;
use ct_metrics_reporter::commercetools::{CommercetoolsClient, TokenCache};
use ct_metrics_reporter::{MetricStrategies, ReportError, ReporterConfig, RunSummary, run_metric};

/// How the final total is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable total line
    Text,
    /// Pretty-printed JSON summary
    Json,
}

/// Run the report and print the total.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the range is empty,
/// or any query fails. Nothing is printed on failure.
pub async fn run(
    mode: MetricMode,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    format: OutputFormat,
) -> Result<(), ReportError> {
    let config = ReporterConfig::from_env()?;
    let span = TimeRange::new(from, to)?;

    let http = build_http_client(&config)?;
    let credentials = TokenCache::new(http.clone(), &config);
    let client = CommercetoolsClient::new(http, &config, &credentials);
    let strategies = MetricStrategies::new(&client, &config.store_key);

    tracing::info!(
        mode = %mode,
        span = %span,
        store = %config.store_key,
        project = %config.project_key,
        "Starting report"
    );

    let total = run_metric(&strategies, mode, span).await?;
    let summary = RunSummary::new(mode, span, total);

    let output = match format {
        OutputFormat::Text => render_text(&summary, span),
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }

    Ok(())
}

fn render_text(summary: &RunSummary, span: TimeRange) -> String {
    format!(
        "TOTAL ({} to {}): {}",
        span.from().format("%Y-%m-%d"),
        span.to().format("%Y-%m-%d"),
        summary.total
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_render_text_uses_calendar_dates() {
        let span = TimeRange::new(
            Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 8, 23, 59, 0).unwrap(),
        )
        .unwrap();
        let summary = RunSummary::new(MetricMode::CartTotal, span, 12_345);

        assert_eq!(
            render_text(&summary, span),
            "TOTAL (2026-02-02 to 2026-02-08): 12345"
        );
    }
}
