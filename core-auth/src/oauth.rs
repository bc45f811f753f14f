//! OAuth 2.0 Authorization Code Flow
//!
//! Smartsheet does not accept the client secret on the wire. Both the code
//! exchange and the refresh send a `hash` field instead: the uppercase hex
//! SHA-256 of `client_secret|code` (or `client_secret|refresh_token`).
//!
//! Token requests go through [`RequestExecutor::execute_form`], so they get
//! the same retry and error classification as every other call.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthConfig, OAuthFlow};
//! use core_auth::AccessScope;
//! use core_client::RequestExecutor;
//! use std::sync::Arc;
//!
//! # async fn example(executor: Arc<RequestExecutor>) -> core_auth::Result<()> {
//! let config = OAuthConfig::new("client-id", "client-secret")
//!     .with_scopes([AccessScope::ReadSheets, AccessScope::WriteSheets])
//!     .with_redirect_uri("https://example.com/callback");
//!
//! let flow = OAuthFlow::new(config, executor);
//! let url = flow.authorization_url("opaque-state")?;
//! // Send the user to `url`, then on callback:
//! let tokens = flow.exchange_code("code-from-callback").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessScope, OAuthTokens, Token};
use chrono::Utc;
use core_client::{CallOptions, RequestExecutor};
use core_runtime::config::ClientConfig;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.smartsheet.com/b/authorize";

/// Token endpoint, relative to the API base URL.
pub const TOKEN_PATH: &str = "token";

/// Client credentials and endpoints for the authorization code flow.
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub scopes: Vec<AccessScope>,
    pub authorize_url: String,
    pub token_path: String,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            scopes: Vec::new(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_path: TOKEN_PATH.to_string(),
        }
    }

    /// Take the client id and secret from a runtime configuration.
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) if config.has_oauth_credentials() => {
                Ok(Self::new(id.clone(), secret.clone()))
            }
            _ => Err(AuthError::MissingCredentials(
                "client_id and client_secret must both be configured".to_string(),
            )),
        }
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = AccessScope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("authorize_url", &self.authorize_url)
            .field("token_path", &self.token_path)
            .finish()
    }
}

#[derive(Serialize)]
struct TokenForm<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    hash: String,
}

/// Uppercase hex SHA-256 of `secret|value`.
pub fn token_hash(secret: &str, value: &str) -> String {
    let digest = Sha256::digest(format!("{}|{}", secret, value).as_bytes());
    format!("{:X}", digest)
}

/// Drives the authorization code flow against one API host.
pub struct OAuthFlow {
    config: OAuthConfig,
    executor: Arc<RequestExecutor>,
    options: CallOptions,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig, executor: Arc<RequestExecutor>) -> Self {
        Self {
            config,
            executor,
            options: CallOptions::default(),
        }
    }

    /// Cancellation and deadline applied to token requests.
    pub fn with_call_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// URL the user visits to grant access. `state` is echoed back on the
    /// callback unchanged.
    #[instrument(skip_all, fields(client_id = %self.config.client_id))]
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| AuthError::InvalidAuthUrl(e.to_string()))?;

        let scope = self
            .config
            .scopes
            .iter()
            .map(AccessScope::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.config.client_id);
            if let Some(redirect_uri) = &self.config.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri);
            }
            query.append_pair("state", state);
            query.append_pair("scope", &scope);
        }

        debug!(scopes = self.config.scopes.len(), "Built authorization URL");
        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens.
    #[instrument(skip_all, fields(client_id = %self.config.client_id))]
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }

        let form = TokenForm {
            grant_type: "authorization_code",
            client_id: &self.config.client_id,
            code: Some(code),
            refresh_token: None,
            hash: token_hash(&self.config.client_secret, code),
        };

        self.request_token(&form).await
    }

    /// Trade a refresh token for a new token pair.
    #[instrument(skip_all, fields(client_id = %self.config.client_id))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }

        let form = TokenForm {
            grant_type: "refresh_token",
            client_id: &self.config.client_id,
            code: None,
            refresh_token: Some(refresh_token),
            hash: token_hash(&self.config.client_secret, refresh_token),
        };

        self.request_token(&form).await
    }

    async fn request_token(&self, form: &TokenForm<'_>) -> Result<OAuthTokens> {
        let body =
            serde_urlencoded::to_string(form).map_err(|e| AuthError::Encoding(e.to_string()))?;

        let token: Token = self
            .executor
            .execute_form(&self.config.token_path, body, &self.options)
            .await?;

        debug!(
            grant_type = form.grant_type,
            expires_in = ?token.expires_in,
            "Token issued"
        );
        Ok(OAuthTokens::from_token(token, Utc::now()))
    }
}
