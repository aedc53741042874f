//! commercetools metrics reporter.
//!
//! Counts carts, orders and customers over a date range through the
//! commercetools GraphQL API and sums them into a single total.
//!
//! # Modules
//!
//! - [`config`] - connection settings loaded from the environment
//! - [`commercetools`] - token cache, GraphQL client and query builders
//! - [`strategies`] - one counting strategy per [`MetricMode`](ct_metrics_core::MetricMode)
//! - [`adaptive`] - threshold-driven split of a single interval
//! - [`runner`] - interval generation and accumulation over a full span
//!
//! # Example
//!
//! ```rust,no_run
//! use ct_metrics_core::{MetricMode, TimeRange};
//! use ct_metrics_reporter::commercetools::{CommercetoolsClient, TokenCache, client::build_http_client};
//! use ct_metrics_reporter::{MetricStrategies, ReporterConfig, run_metric};
//!
//! # async fn report(span: TimeRange) -> Result<u64, ct_metrics_reporter::ReportError> {
//! let config = ReporterConfig::from_env()?;
//! let http = build_http_client(&config)?;
//! let credentials = TokenCache::new(http.clone(), &config);
//! let client = CommercetoolsClient::new(http, &config, &credentials);
//! let strategies = MetricStrategies::new(&client, &config.store_key);
//!
//! run_metric(&strategies, MetricMode::CartTotal, span).await
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adaptive;
pub mod commercetools;
pub mod config;
pub mod error;
pub mod runner;
pub mod strategies;

#[cfg(test)]
mod testing;

pub use adaptive::{SPLIT_THRESHOLD, execute_metric};
pub use config::{ConfigError, ReporterConfig};
pub use error::{GraphQLError, ReportError};
pub use runner::{RunSummary, run_metric};
pub use strategies::{MetricEvaluator, MetricStrategies};
