//! # Client Configuration Module
//!
//! Provides configuration management for the Smartsheet client.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ClientConfig` holding the credentials, API location, retry ceiling and
//! HTTP transport the request executor needs. Validation is fail-fast: a
//! missing transport or an out-of-range value is rejected by
//! [`ClientConfigBuilder::build`] rather than at the first request.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - desktop default (`reqwest`) when the `desktop-shims`
//!   feature is enabled, otherwise must be injected
//!
//! ## Usage
//!
//! ### Desktop defaults
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .access_token("ll352u9jujauoqz4gstvsae05")
//!     .change_agent("nightly-import")
//!     .build()?;
//! ```
//!
//! ### From the environment
//!
//! ```ignore
//! use core_runtime::config::ClientConfigBuilder;
//!
//! // Reads SMARTSHEET_ACCESS_TOKEN, SMARTSHEET_CHANGE_AGENT, ...
//! let config = ClientConfigBuilder::from_env().build()?;
//! ```
//!
//! An access token is optional at build time: OAuth-only callers have none
//! until the code exchange completes, and every request may carry a
//! per-call token override instead. The executor rejects a request that ends
//! up with no token at all.

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.smartsheet.com/2.0/";

/// Attempts per call before the executor gives up.
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 10;

/// Upper bound accepted for [`ClientConfigBuilder::attempt_limit`].
pub const MAX_ATTEMPT_LIMIT: u32 = 50;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_ACCESS_TOKEN: &str = "SMARTSHEET_ACCESS_TOKEN";
pub const ENV_CHANGE_AGENT: &str = "SMARTSHEET_CHANGE_AGENT";
pub const ENV_CLIENT_ID: &str = "SMARTSHEET_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SMARTSHEET_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "SMARTSHEET_BASE_URL";

/// Client configuration.
///
/// Use [`ClientConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ClientConfig {
    /// Default bearer token. Individual calls may override it.
    pub access_token: Option<String>,

    /// Value for the `Smartsheet-Change-Agent` audit header
    pub change_agent: Option<String>,

    /// OAuth application id
    pub client_id: Option<String>,

    /// OAuth application secret, used only to derive the token request hash
    pub client_secret: Option<String>,

    /// API root; always ends with `/`
    pub base_url: String,

    /// Attempts per call, including the first one
    pub attempt_limit: u32,

    /// Per-attempt transport timeout
    pub request_timeout: Duration,

    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("change_agent", &self.change_agent)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("attempt_limit", &self.attempt_limit)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The base URL is an absolute http(s) URL
    /// - The attempt limit is within `1..=MAX_ATTEMPT_LIMIT`
    /// - The request timeout is non-zero
    /// - Token and change agent, when set, are not blank
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.attempt_limit == 0 {
            return Err(Error::Config(
                "Attempt limit must be at least 1".to_string(),
            ));
        }

        if self.attempt_limit > MAX_ATTEMPT_LIMIT {
            return Err(Error::Config(format!(
                "Attempt limit exceeds maximum of {}",
                MAX_ATTEMPT_LIMIT
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if matches!(self.access_token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(Error::Config(
                "Access token cannot be blank; omit it instead".to_string(),
            ));
        }

        if matches!(self.change_agent.as_deref(), Some(a) if a.trim().is_empty()) {
            return Err(Error::Config("Change agent cannot be blank".to_string()));
        }

        Ok(())
    }

    /// Whether both halves of the OAuth application credentials are present.
    pub fn has_oauth_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client =
        ReqwestHttpClient::with_timeout(timeout).map_err(|e| Error::TransportSetup(e.to_string()))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Other hosts: inject an HttpClient with .http_client()."
            .to_string(),
    })
}

fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

/// Builder for constructing [`ClientConfig`] instances.
#[derive(Default)]
pub struct ClientConfigBuilder {
    access_token: Option<String>,
    change_agent: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: Option<String>,
    attempt_limit: Option<u32>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl ClientConfigBuilder {
    /// Seeds a builder from `SMARTSHEET_*` environment variables.
    ///
    /// Unset or empty variables are ignored; explicit builder calls made
    /// afterwards take precedence.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            access_token: read(ENV_ACCESS_TOKEN),
            change_agent: read(ENV_CHANGE_AGENT),
            client_id: read(ENV_CLIENT_ID),
            client_secret: read(ENV_CLIENT_SECRET),
            base_url: read(ENV_BASE_URL),
            ..Self::default()
        }
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the audit tag sent as `Smartsheet-Change-Agent` on every call.
    pub fn change_agent(mut self, agent: impl Into<String>) -> Self {
        self.change_agent = Some(agent.into());
        self
    }

    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Overrides the API root. A trailing `/` is added when missing so that
    /// relative endpoint paths join underneath it.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the number of attempts per call.
    ///
    /// Default: 10
    pub fn attempt_limit(mut self, limit: u32) -> Self {
        self.attempt_limit = Some(limit);
        self
    }

    /// Sets the per-attempt transport timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the final `ClientConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` on success, or an error if:
    /// - No HTTP client is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<ClientConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let config = ClientConfig {
            access_token: self.access_token,
            change_agent: self.change_agent,
            client_id: self.client_id,
            client_secret: self.client_secret,
            base_url: normalize_base_url(
                self.base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ),
            attempt_limit: self.attempt_limit.unwrap_or(DEFAULT_ATTEMPT_LIMIT),
            request_timeout,
            http_client,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpRequest, HttpResponse};
    use std::collections::HashMap;

    struct NoopHttpClient;

    #[async_trait]
    impl HttpClient for NoopHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    fn builder() -> ClientConfigBuilder {
        ClientConfig::builder().http_client(Arc::new(NoopHttpClient))
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder().access_token("token").build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.attempt_limit, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert!(config.change_agent.is_none());
        assert!(!config.has_oauth_credentials());
    }

    #[test]
    fn test_builder_without_token_is_allowed() {
        let config = builder().build().unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = builder()
            .base_url("https://api.smartsheetgov.com/2.0")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "https://api.smartsheetgov.com/2.0/");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = builder().base_url("ftp://example.com/").build().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = builder().attempt_limit(0).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_excessive_attempts() {
        let err = builder()
            .attempt_limit(MAX_ATTEMPT_LIMIT + 1)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("maximum"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = builder()
            .request_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_blank_token_and_agent() {
        assert!(builder().access_token("   ").build().is_err());
        assert!(builder().change_agent("").build().is_err());
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            (ENV_ACCESS_TOKEN, "env-token"),
            (ENV_CHANGE_AGENT, "importer"),
            (ENV_CLIENT_ID, "app-id"),
            (ENV_CLIENT_SECRET, "app-secret"),
            (ENV_BASE_URL, ""),
        ]
        .into_iter()
        .collect();

        let config = ClientConfigBuilder::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
            .http_client(Arc::new(NoopHttpClient))
            .build()
            .unwrap();

        assert_eq!(config.access_token.as_deref(), Some("env-token"));
        assert_eq!(config.change_agent.as_deref(), Some("importer"));
        assert!(config.has_oauth_credentials());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_explicit_values_override_environment() {
        let config = ClientConfigBuilder::from_lookup(|k| {
            (k == ENV_ACCESS_TOKEN).then(|| "env-token".to_string())
        })
        .access_token("explicit")
        .http_client(Arc::new(NoopHttpClient))
        .build()
        .unwrap();

        assert_eq!(config.access_token.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = builder()
            .access_token("super-secret-token")
            .client_secret("super-secret")
            .build()
            .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_is_reported() {
        let err = ClientConfig::builder().build().unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { .. }));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let config = ClientConfig::builder()
            .access_token("token")
            .build()
            .expect("desktop defaults should succeed");
        assert_eq!(config.attempt_limit, DEFAULT_ATTEMPT_LIMIT);
    }
}
