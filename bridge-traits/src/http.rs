//! HTTP Transport Seam
//!
//! A single-attempt transport. Retry, backoff and error classification are
//! layered on top by the request executor, so implementations must not retry
//! on their own.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// The verbs the Smartsheet API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// One fully built request.
///
/// The executor builds a fresh value for every attempt, headers included.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    /// Per-attempt transport timeout
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Set a header, replacing any value already set under the same name
    /// (compared case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    pub fn bearer_token(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }
}

/// A received response. Any status, including 4xx and 5xx, arrives here.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    /// Body as text for error messages; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn lookup<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Sends one request and returns whatever came back.
///
/// Shared behind an `Arc` by concurrent calls.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
///
/// async fn whoami(client: &dyn HttpClient, token: &str) -> bridge_traits::error::Result<u16> {
///     let request = HttpRequest::new(HttpMethod::Get, "https://api.smartsheet.com/2.0/users/me")
///         .bearer_token(token);
///     Ok(client.execute(request).await?.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute `request` exactly once.
    ///
    /// # Errors
    ///
    /// Only for failures with no response at all (DNS, TLS, connect, timeout).
    /// Use [`BridgeError::Timeout`](crate::error::BridgeError::Timeout) or
    /// [`BridgeError::Connection`](crate::error::BridgeError::Connection) when
    /// resending could succeed.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_replace_case_insensitively() {
        let request = HttpRequest::new(HttpMethod::Get, "https://api.smartsheet.com/2.0/home")
            .header("accept", "text/csv")
            .header("Accept", "application/json")
            .bearer_token("t0k3n");

        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.header_value("ACCEPT"), Some("application/json"));
        assert_eq!(request.header_value("authorization"), Some("Bearer t0k3n"));
    }

    #[test]
    fn test_body_and_timeout() {
        let request = HttpRequest::new(HttpMethod::Post, "https://api.smartsheet.com/2.0/token")
            .body("grant_type=refresh_token")
            .timeout(Duration::from_secs(30));

        assert_eq!(
            request.body.as_deref(),
            Some(b"grant_type=refresh_token".as_slice())
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(429, Bytes::from_static(b"{\"errorCode\":4001}"))
            .with_header("Retry-After", "60");

        assert_eq!(response.header_value("retry-after"), Some("60"));
        assert_eq!(response.body_text(), "{\"errorCode\":4001}");

        let garbled = HttpResponse::new(500, Bytes::from_static(&[0xff, b'x']));
        assert_eq!(garbled.body_text(), "\u{fffd}x");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }
}
