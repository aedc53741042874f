//! Error types for the reporter.

use ct_metrics_core::RangeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can abort a metrics run.
///
/// Every variant propagates unchanged up to the caller; nothing in the
/// reporter recovers locally.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client-credentials exchange was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered a query with a non-success status.
    #[error("GraphQL request failed: {status} {body}")]
    QueryFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The query reached the API but the response carries an error list.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// The mode has no strategy on this code path.
    #[error("Unsupported metric mode: {0}")]
    UnsupportedMode(String),

    /// A range precondition was violated.
    #[error("Invalid range: {0}")]
    Range(#[from] RangeError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A GraphQL error returned by the commercetools API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
