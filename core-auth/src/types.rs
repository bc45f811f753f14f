use chrono::{DateTime, Duration, Utc};
use core_models::ApiResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission requested during authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessScope {
    ReadSheets,
    WriteSheets,
    ShareSheets,
    DeleteSheets,
    CreateSheets,
    ReadUsers,
    ReadContacts,
    AdminUsers,
    AdminSheets,
    AdminWorkspaces,
    AdminWebhooks,
}

impl AccessScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessScope::ReadSheets => "READ_SHEETS",
            AccessScope::WriteSheets => "WRITE_SHEETS",
            AccessScope::ShareSheets => "SHARE_SHEETS",
            AccessScope::DeleteSheets => "DELETE_SHEETS",
            AccessScope::CreateSheets => "CREATE_SHEETS",
            AccessScope::ReadUsers => "READ_USERS",
            AccessScope::ReadContacts => "READ_CONTACTS",
            AccessScope::AdminUsers => "ADMIN_USERS",
            AccessScope::AdminSheets => "ADMIN_SHEETS",
            AccessScope::AdminWorkspaces => "ADMIN_WORKSPACES",
            AccessScope::AdminWebhooks => "ADMIN_WEBHOOKS",
        }
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token endpoint response.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl ApiResult for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A token pair with an absolute expiry.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` when the server did not report a lifetime
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthTokens {
    pub fn from_token(token: Token, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .map(|seconds| issued_at + Duration::seconds(seconds)),
        }
    }

    /// Expired, or expiring within `buffer_seconds`.
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(buffer_seconds) >= expires_at,
            None => false,
        }
    }

    /// Expired or expiring within five minutes.
    pub fn is_expired(&self) -> bool {
        self.is_expired_with_buffer(300)
    }
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_deserialization() {
        let token: Token = serde_json::from_str(
            r#"{"access_token": "ll352u9jujauoqz4gstvsae05", "token_type": "bearer",
                "refresh_token": "e9x352a9mp4151le2505", "expires_in": 604799}"#,
        )
        .unwrap();

        assert_eq!(token.expires_in, Some(604799));
        assert_eq!(token.token_type.as_deref(), Some("bearer"));
    }

    #[test]
    fn test_expiry_from_lifetime() {
        let now = Utc::now();
        let token = Token {
            access_token: "a".into(),
            token_type: None,
            refresh_token: Some("r".into()),
            expires_in: Some(600),
        };

        let tokens = OAuthTokens::from_token(token, now);

        assert_eq!(tokens.expires_at, Some(now + Duration::seconds(600)));
        assert!(!tokens.is_expired_with_buffer(60));
        assert!(tokens.is_expired_with_buffer(900));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let tokens = OAuthTokens {
            access_token: "secret-access".into(),
            refresh_token: Some("secret-refresh".into()),
            expires_at: None,
        };

        let rendered = format!("{:?}", tokens);
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_scope_names() {
        assert_eq!(AccessScope::AdminWebhooks.to_string(), "ADMIN_WEBHOOKS");
        assert_eq!(
            serde_json::to_value(AccessScope::ReadSheets).unwrap(),
            "READ_SHEETS"
        );
    }
}
