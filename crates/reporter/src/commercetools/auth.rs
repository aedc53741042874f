//! commercetools authentication module.
//!
//! Handles the OAuth client-credentials exchange and keeps the resulting
//! bearer token until shortly before it expires.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::ReportError;
use crate::config::ReporterConfig;

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Bearer token obtained from the client-credentials exchange.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Token sent as `Authorization: Bearer ...`.
    pub access_token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

/// Response from the commercetools token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

impl AccessToken {
    /// Check if the token has expired, allowing a 60 second margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }

    #[must_use]
    pub const fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at - EXPIRY_MARGIN_SECS
    }
}

/// Exchange client credentials for a bearer token.
///
/// # Errors
///
/// Returns `ReportError::Authentication` on a non-success status and
/// `ReportError::Http` on transport failure.
#[instrument(skip(client, client_secret), fields(client_id = %client_id))]
pub async fn request_token(
    client: &reqwest::Client,
    endpoint: &str,
    client_id: &str,
    client_secret: &SecretString,
) -> Result<AccessToken, ReportError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(endpoint)
        .basic_auth(client_id, Some(client_secret.expose_secret()))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ReportError::Authentication(format!(
            "Failed to get access token: HTTP {status}: {error_text}"
        )));
    }

    let token_response: TokenResponse = response.json().await?;
    tracing::info!(expires_in = token_response.expires_in, "Access token obtained");

    Ok(AccessToken {
        access_token: SecretString::from(token_response.access_token),
        expires_at: now + token_response.expires_in,
    })
}

/// Process-wide credential holder.
///
/// Built once at startup and lent to the API client. The token is fetched
/// lazily on first use and replaced once it is within the expiry margin.
/// Only [`TokenCache::acquire`] writes to the cache.
pub struct TokenCache {
    client: reqwest::Client,
    endpoint: String,
    client_id: String,
    client_secret: SecretString,
    token: RwLock<Option<AccessToken>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Create an empty cache for the configured OAuth client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ReporterConfig) -> Self {
        Self {
            client,
            endpoint: config.token_endpoint(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: RwLock::new(None),
        }
    }

    /// Create a cache pre-loaded with a token.
    #[cfg(test)]
    pub(crate) fn with_token(client: reqwest::Client, config: &ReporterConfig, token: AccessToken) -> Self {
        let cache = Self::new(client, config);
        Self {
            token: RwLock::new(Some(token)),
            ..cache
        }
    }

    /// Whether the cached token is missing or expired.
    pub async fn is_expired(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .is_none_or(AccessToken::is_expired)
    }

    /// Return a valid bearer token, exchanging credentials if needed.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the credentials exchange.
    pub async fn acquire(&self) -> Result<SecretString, ReportError> {
        if let Some(token) = self.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        let mut guard = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        let token = request_token(
            &self.client,
            &self.endpoint,
            &self.client_id,
            &self.client_secret,
        )
        .await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }
}
