//! Request executor
//!
//! Every API call goes through [`RequestExecutor`]. A call is a loop of
//! attempts, each one:
//!
//! 1. sleeps for the current wait, if any
//! 2. sends a freshly built request
//! 3. classifies the response (see [`crate::classify`])
//!
//! A 200 ends the loop with the parsed body. A 429/500/503 goes around again,
//! escalating the wait when the error code asks for it. Timeouts and dropped
//! connections go around too, backing off from one second. Anything else fails
//! immediately. The loop gives up after the configured attempt limit.
//!
//! Retry bookkeeping lives in a value local to each call and every request
//! owns its header set, so one executor can serve concurrent calls.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_models::{ApiResult, ErrorResponse};
use core_runtime::config::ClientConfig;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::backoff::next_wait;
use crate::classify::{classify, Classification};
use crate::error::{ApiError, Result};

/// Audit attribution header.
pub const CHANGE_AGENT_HEADER: &str = "Smartsheet-Change-Agent";

pub(crate) const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
/// Starting wait after a timeout or dropped connection.
const TRANSPORT_FLOOR: Duration = Duration::from_secs(1);

/// Per-call cancellation and deadline.
///
/// Either one aborts the call before the next attempt, during a backoff
/// sleep or while a request is in flight, yielding [`ApiError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub cancel: Option<CancellationToken>,
    pub deadline: Option<Instant>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now.
    pub fn with_timeout(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }
}

/// Attempt counter and current wait of one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryState {
    pub attempt: u32,
    pub wait: Duration,
}

/// Everything needed to build the request for one attempt.
#[derive(Debug, Clone)]
pub(crate) struct Outgoing {
    pub method: HttpMethod,
    pub url: String,
    accept: String,
    bearer: Option<String>,
    body: Option<Bytes>,
    headers: Vec<(String, String)>,
}

impl Outgoing {
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            accept: JSON.to_string(),
            bearer: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn bearer(mut self, token: String) -> Self {
        self.bearer = Some(token);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.body = Some(body.into());
        self.header("Content-Type", content_type)
    }

    fn to_request(&self, change_agent: Option<&str>, timeout: Duration) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url.clone())
            .header("Accept", self.accept.as_str())
            .timeout(timeout);

        if let Some(token) = &self.bearer {
            request = request.bearer_token(token.as_str());
        }
        if let Some(agent) = change_agent {
            request = request.header(CHANGE_AGENT_HEADER, agent);
        }
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &self.body {
            request = request.body(body.clone());
        }

        request
    }
}

/// The single chokepoint for API calls.
pub struct RequestExecutor {
    http_client: Arc<dyn HttpClient>,
    base_url: Url,
    access_token: Option<String>,
    change_agent: Option<String>,
    attempt_limit: u32,
    request_timeout: Duration,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("change_agent", &self.change_agent)
            .field("attempt_limit", &self.attempt_limit)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::Validation(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            http_client: Arc::clone(&config.http_client),
            base_url,
            access_token: config.access_token.clone(),
            change_agent: config.change_agent.clone(),
            attempt_limit: config.attempt_limit,
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn attempt_limit(&self) -> u32 {
        self.attempt_limit
    }

    /// Join a relative API path onto the base url. Absolute urls pass through.
    pub fn resolve_url(&self, path: &str) -> Result<String> {
        if path.starts_with("https://") || path.starts_with("http://") {
            return Ok(path.to_string());
        }

        self.base_url
            .join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| ApiError::Validation(format!("Invalid request path '{}': {}", path, e)))
    }

    /// Token for this call: the override if given, else the configured one.
    pub(crate) fn bearer(&self, auth: Option<&str>) -> Result<String> {
        auth.or(self.access_token.as_deref())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("No access token supplied".to_string()))
    }

    /// Send a JSON request and decode the JSON response.
    pub async fn execute<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        auth: Option<&str>,
    ) -> Result<T>
    where
        T: ApiResult,
        B: Serialize + ?Sized + Sync,
    {
        self.execute_with(method, path, body, auth, &CallOptions::default())
            .await
    }

    /// [`execute`](Self::execute) with cancellation and deadline.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn execute_with<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        auth: Option<&str>,
        options: &CallOptions,
    ) -> Result<T>
    where
        T: ApiResult,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.resolve_url(path)?;
        let mut outgoing = Outgoing::new(method, url).bearer(self.bearer(auth)?);

        if let Some(body) = body {
            let json =
                serde_json::to_vec(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
            outgoing = outgoing.body(json, JSON);
        }

        let response = self.run(&outgoing, options).await?;
        parse_body(&outgoing.url, &response)
    }

    /// POST a form-encoded body without a bearer token.
    #[instrument(skip_all, fields(path = %path))]
    pub async fn execute_form<T: ApiResult>(
        &self,
        path: &str,
        form: String,
        options: &CallOptions,
    ) -> Result<T> {
        let url = self.resolve_url(path)?;
        let outgoing = Outgoing::new(HttpMethod::Post, url).body(form, FORM);

        let response = self.run(&outgoing, options).await?;
        parse_body(&outgoing.url, &response)
    }

    /// GET with a caller-chosen `Accept`, returning the raw body.
    #[instrument(skip_all, fields(path = %path, accept = %accept))]
    pub async fn download(
        &self,
        path: &str,
        accept: &str,
        auth: Option<&str>,
        options: &CallOptions,
    ) -> Result<Bytes> {
        let url = self.resolve_url(path)?;
        let outgoing = Outgoing::new(HttpMethod::Get, url)
            .accept(accept)
            .bearer(self.bearer(auth)?);

        let response = self.run(&outgoing, options).await?;
        debug!(bytes = response.body.len(), "Download complete");
        Ok(response.body)
    }

    /// The retry loop shared by every entry point.
    pub(crate) async fn run(
        &self,
        outgoing: &Outgoing,
        options: &CallOptions,
    ) -> Result<HttpResponse> {
        let url = outgoing.url.as_str();
        let mut state = RetryState::default();

        while state.attempt < self.attempt_limit {
            if !state.wait.is_zero() {
                debug!(url, wait_ms = state.wait.as_millis() as u64, "Backing off");
                guarded(url, options, tokio::time::sleep(state.wait)).await?;
            }

            state.attempt += 1;
            let request = outgoing.to_request(self.change_agent.as_deref(), self.request_timeout);
            debug!(method = %outgoing.method, url, attempt = state.attempt, "Sending request");

            let response = match guarded(url, options, self.http_client.execute(request)).await? {
                Ok(response) => response,
                Err(e) if e.is_transient() && state.attempt < self.attempt_limit => {
                    state.wait = next_wait(state.wait, TRANSPORT_FLOOR);
                    warn!(
                        url,
                        attempt = state.attempt,
                        wait_ms = state.wait.as_millis() as u64,
                        error = %e,
                        "Transport failure, retrying"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(url, error = %e, "Transport failure");
                    return Err(ApiError::Transport(e));
                }
            };

            let status = response.status;
            let error = if status == 200 {
                None
            } else {
                ErrorResponse::parse(&response.body)
            };
            let error_code = error.as_ref().and_then(|e| e.error_code);

            match classify(status, error_code) {
                Classification::Success => {
                    debug!(url, attempt = state.attempt, "Request succeeded");
                    return Ok(response);
                }
                Classification::Retry { floor } => {
                    if let Some(floor) = floor {
                        state.wait = next_wait(state.wait, floor);
                    }
                    warn!(
                        url,
                        status,
                        error_code,
                        wait_ms = state.wait.as_millis() as u64,
                        attempt = state.attempt,
                        "Retryable response"
                    );
                }
                Classification::Fatal => {
                    warn!(url, status, error_code, "Request failed");
                    let message = error.and_then(|e| e.message);
                    return Err(ApiError::Fatal {
                        status,
                        error_code,
                        message,
                        url: url.to_string(),
                    });
                }
            }
        }

        warn!(url, attempts = state.attempt, "Retries exceeded");
        Err(ApiError::RetriesExceeded {
            url: url.to_string(),
            attempts: state.attempt,
        })
    }
}

fn parse_body<T: ApiResult>(url: &str, response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Run `work` unless the call is cancelled or its deadline passes first.
async fn guarded<F: Future>(url: &str, options: &CallOptions, work: F) -> Result<F::Output> {
    let cancelled = async {
        match &options.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };
    let expired = async {
        match options.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => {
            debug!(url, "Call cancelled");
            Err(ApiError::Cancelled { url: url.to_string() })
        }
        _ = expired => {
            debug!(url, "Call deadline passed");
            Err(ApiError::Cancelled { url: url.to_string() })
        }
        output = work => Ok(output),
    }
}
