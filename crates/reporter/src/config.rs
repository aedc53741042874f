//! Reporter configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CT_PROJECT_KEY` - commercetools project key
//! - `CT_CLIENT_ID` - API client ID
//! - `CT_CLIENT_SECRET` - API client secret
//! - `CT_AUTH_URL` - OAuth host (e.g. `https://auth.europe-west1.gcp.commercetools.com`)
//! - `CT_API_URL` - API host (e.g. `https://api.europe-west1.gcp.commercetools.com`)
//!
//! ## Optional
//! - `CT_STORE_KEY` - Store every query is scoped to (default: kwh)
//! - `CT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_STORE_KEY: &str = "kwh";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the commercetools API.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct ReporterConfig {
    /// Project key, the first path segment of every API call
    pub project_key: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Base URL of the OAuth service
    pub auth_url: Url,
    /// Base URL of the HTTP API
    pub api_url: Url,
    /// Store key used in every `where` predicate
    pub store_key: String,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl std::fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_url", &self.auth_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .field("store_key", &self.store_key)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl ReporterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ReporterConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let project_key = required("CT_PROJECT_KEY")?;
        let client_id = required("CT_CLIENT_ID")?;
        let client_secret = SecretString::from(required("CT_CLIENT_SECRET")?);
        let auth_url = parse_url("CT_AUTH_URL", &required("CT_AUTH_URL")?)?;
        let api_url = parse_url("CT_API_URL", &required("CT_API_URL")?)?;

        let store_key = lookup("CT_STORE_KEY").unwrap_or_else(|| DEFAULT_STORE_KEY.to_string());
        let timeout_secs = lookup("CT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("CT_HTTP_TIMEOUT_SECS".to_string(), e.to_string()))?;

        if let Some(pattern) = placeholder_pattern(client_secret.expose_secret()) {
            tracing::warn!("CT_CLIENT_SECRET looks like a placeholder (contains '{pattern}')");
        }

        Ok(Self {
            project_key,
            client_id,
            client_secret,
            auth_url,
            api_url,
            store_key,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Token endpoint for the client-credentials exchange.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth/token", self.auth_url.as_str().trim_end_matches('/'))
    }

    /// GraphQL endpoint for the configured project.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "{}/{}/graphql",
            self.api_url.as_str().trim_end_matches('/'),
            self.project_key
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Return the first placeholder pattern contained in `secret`, if any.
fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}
