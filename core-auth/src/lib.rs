//! # Authentication
//!
//! OAuth 2.0 authorization code flow for third-party Smartsheet apps.
//!
//! Direct API access tokens need none of this and go straight into
//! [`core_runtime::config::ClientConfig`]. Apps acting on behalf of other
//! users send them to [`OAuthFlow::authorization_url`], exchange the returned
//! code for a token pair, and refresh it before it expires.

pub mod error;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{token_hash, OAuthConfig, OAuthFlow, DEFAULT_AUTHORIZE_URL, TOKEN_PATH};
pub use types::{AccessScope, OAuthTokens, Token};
