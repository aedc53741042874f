//! commercetools GraphQL API client.

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use super::QueryExecutor;
use super::auth::TokenCache;
use crate::config::ReporterConfig;
use crate::{GraphQLError, ReportError};

/// commercetools GraphQL API client.
///
/// # Authentication
///
/// Borrows the process-wide [`TokenCache`]; every request asks the cache
/// for a token, which exchanges credentials only when the cached token is
/// missing or about to expire.
#[derive(Debug, Clone)]
pub struct CommercetoolsClient<'a> {
    client: reqwest::Client,
    endpoint: String,
    credentials: &'a TokenCache,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

/// Build the HTTP client shared by the token exchange and API calls.
///
/// # Errors
///
/// Returns `ReportError::Http` if the TLS backend cannot be initialised.
pub fn build_http_client(config: &ReporterConfig) -> Result<reqwest::Client, ReportError> {
    Ok(reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?)
}

impl<'a> CommercetoolsClient<'a> {
    /// Create a client for the configured project.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ReporterConfig, credentials: &'a TokenCache) -> Self {
        Self {
            client,
            endpoint: config.graphql_endpoint(),
            credentials,
        }
    }
}

impl QueryExecutor for CommercetoolsClient<'_> {
    /// Execute a GraphQL query.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Authentication` if no token can be obtained.
    /// Returns `ReportError::QueryFailed` on a non-success status.
    /// Returns `ReportError::GraphQL` if the body carries errors.
    /// Returns `ReportError::Http` on network failures.
    #[instrument(skip(self, query), fields(endpoint = %self.endpoint))]
    async fn execute(&self, query: &str) -> Result<serde_json::Value, ReportError> {
        let access_token = self.credentials.acquire().await?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(access_token.expose_secret())
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReportError::QueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_graphql_body(&body)
    }
}

/// Extract `data` from a GraphQL response body, surfacing reported errors.
fn parse_graphql_body(body: &str) -> Result<serde_json::Value, ReportError> {
    let graphql_response: GraphQLResponse = serde_json::from_str(body)?;

    if let Some(errors) = graphql_response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                path: e.path,
            })
            .collect();
        return Err(ReportError::GraphQL(converted_errors));
    }

    Ok(graphql_response.data.unwrap_or(serde_json::Value::Null))
}
