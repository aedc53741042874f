//! commercetools GraphQL API access.
//!
//! # Architecture
//!
//! - Client-credentials OAuth: client id/secret → bearer token → API
//! - One [`auth::TokenCache`] per process, built at the composition root and
//!   lent to the client
//! - Queries are plain strings built in [`queries`]; results come back as
//!   the untyped GraphQL `data` object so strategies can default absent
//!   count fields to zero

pub mod auth;
pub mod client;
pub mod queries;

use std::future::Future;

pub use auth::{AccessToken, TokenCache};
pub use client::CommercetoolsClient;

use crate::ReportError;

/// Executes a GraphQL query string and returns the response `data` object.
///
/// Implementations fail on transport errors, non-success statuses and
/// API-reported error lists. A response without `data` yields
/// `serde_json::Value::Null`.
pub trait QueryExecutor {
    fn execute(&self, query: &str) -> impl Future<Output = Result<serde_json::Value, ReportError>>;
}
