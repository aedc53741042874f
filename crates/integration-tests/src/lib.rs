//! Integration tests for the commercetools metrics reporter.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline pipeline tests
//! cargo test -p ct-metrics-integration-tests
//!
//! # Live tests against a real project (needs CT_* variables)
//! cargo test -p ct-metrics-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `reporting_pipeline` - full runs through the real strategies and a fake API
//! - `live_api` - read-only queries against a configured project
//!
//! This library holds the fake API shared by the test files.

use std::sync::{Mutex, PoisonError};

use ct_metrics_reporter::ReportError;
use ct_metrics_reporter::commercetools::QueryExecutor;
use serde_json::Value;

type Responder = Box<dyn Fn(&str) -> Result<Value, ReportError>>;

/// Stand-in for the commercetools GraphQL endpoint.
///
/// Answers each query document through a responder closure and keeps every
/// query it was sent, in order. Each call yields once before answering so
/// concurrent halves of a split actually interleave.
pub struct FakeCommercetools {
    respond: Responder,
    queries: Mutex<Vec<String>>,
}

impl FakeCommercetools {
    #[must_use]
    pub fn new(respond: impl Fn(&str) -> Result<Value, ReportError> + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of queries whose text contains `needle`.
    #[must_use]
    pub fn count_containing(&self, needle: &str) -> usize {
        self.queries()
            .iter()
            .filter(|query| query.contains(needle))
            .count()
    }
}

impl QueryExecutor for FakeCommercetools {
    async fn execute(&self, query: &str) -> Result<Value, ReportError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_owned());
        tokio::task::yield_now().await;
        (self.respond)(query)
    }
}

/// Lower and upper time bounds of a range-filtered query, as sent.
///
/// Returns `None` for queries without a time predicate, such as lifetime
/// order lookups.
#[must_use]
pub fn window(query: &str) -> Option<(&str, &str)> {
    Some((bound_after(query, ">= \\\"")?, bound_after(query, "< \\\"")?))
}

fn bound_after<'q>(query: &'q str, marker: &str) -> Option<&'q str> {
    let start = query.find(marker)? + marker.len();
    let rest = query.get(start..)?;
    let end = rest.find("\\\"")?;
    rest.get(..end)
}

/// The customer email a lifetime lookup asks about.
#[must_use]
pub fn lookup_email(query: &str) -> Option<&str> {
    bound_after(query, "customerEmail=\\\"")
}
