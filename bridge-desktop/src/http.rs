//! reqwest transport

use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("smartsheet-client-rs/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`HttpClient`] over a pooled `reqwest::Client` with rustls.
///
/// Every call is a single attempt; throttling and transient failures come
/// back to the request executor unchanged.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    inner: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// `timeout` applies to requests that do not carry their own.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .map(Self::from_client)
            .map_err(|e| BridgeError::NotAvailable(format!("reqwest client: {}", e)))
    }

    /// Wrap a client the host already configured (proxy, certificates).
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    fn prepare(&self, request: HttpRequest) -> Result<reqwest::Request> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .inner
            .request(method, &request.url)
            .headers(header_map(&request)?);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(transport_error)
    }
}

fn header_map(request: &HttpRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BridgeError::OperationFailed(format!("bad header name '{}'", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| BridgeError::OperationFailed(format!("bad value for header '{}'", name)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Timeouts and connection failures stay distinguishable so the executor
/// can decide whether another attempt makes sense.
fn transport_error(error: reqwest::Error) -> BridgeError {
    let message = error.to_string();
    if error.is_timeout() {
        BridgeError::Timeout(message)
    } else if error.is_connect() || error.is_request() || error.is_body() {
        BridgeError::Connection(message)
    } else {
        BridgeError::OperationFailed(message)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let prepared = self.prepare(request)?;
        let url = prepared.url().clone();

        let response = match self.inner.execute(prepared).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, url = %url.path(), error = %e, "no response");
                return Err(transport_error(e));
            }
        };

        let status = response.status().as_u16();
        let mut received = HttpResponse::new(status, bytes::Bytes::new());
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                received = received.with_header(name.as_str(), text);
            }
        }
        received.body = response.bytes().await.map_err(transport_error)?;

        debug!(
            %method,
            url = %url.path(),
            status,
            bytes = received.body.len(),
            "response received"
        );
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ReqwestHttpClient {
        ReqwestHttpClient::new().unwrap()
    }

    #[tokio::test]
    async fn test_prepare_maps_request() {
        let request = HttpRequest::new(HttpMethod::Put, "https://api.smartsheet.com/2.0/sheets/1")
            .header("Accept", "application/json")
            .bearer_token("abc")
            .body(bytes::Bytes::from_static(b"{}"))
            .timeout(Duration::from_secs(5));

        let prepared = client().prepare(request).unwrap();

        assert_eq!(prepared.method(), reqwest::Method::PUT);
        assert_eq!(prepared.url().path(), "/2.0/sheets/1");
        assert_eq!(prepared.headers()["accept"], "application/json");
        assert_eq!(prepared.headers()["authorization"], "Bearer abc");
        assert_eq!(prepared.timeout(), Some(&Duration::from_secs(5)));
        assert_eq!(
            prepared.body().and_then(|b| b.as_bytes()),
            Some(b"{}".as_slice())
        );
    }

    #[tokio::test]
    async fn test_delete_without_body() {
        let request = HttpRequest::new(
            HttpMethod::Delete,
            "https://api.smartsheet.com/2.0/sheets/1/rows?ids=2,3",
        );

        let prepared = client().prepare(request).unwrap();

        assert_eq!(prepared.method(), reqwest::Method::DELETE);
        assert_eq!(prepared.url().query(), Some("ids=2,3"));
        assert!(prepared.body().is_none());
    }

    #[tokio::test]
    async fn test_invalid_header_is_rejected() {
        let request = HttpRequest::new(HttpMethod::Get, "https://api.smartsheet.com/2.0/home")
            .header("Smartsheet-Change-Agent", "line\nbreak");

        assert!(matches!(
            client().prepare(request),
            Err(BridgeError::OperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let request = HttpRequest::new(HttpMethod::Get, "not a url");

        assert!(matches!(
            client().prepare(request),
            Err(BridgeError::OperationFailed(_))
        ));
    }
}
