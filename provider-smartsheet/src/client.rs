//! Smartsheet API client
//!
//! [`SmartsheetClient`] is a thin typed layer over [`RequestExecutor`]: every
//! method checks its required arguments, renders a path relative to the API
//! base and lets the executor handle auth, retries and decoding. The
//! endpoint groups live in [`crate::endpoints`].

use std::fmt;
use std::sync::Arc;

use bridge_traits::http::HttpMethod;
use core_client::{ApiResult, CallOptions, RequestExecutor};
use core_models::{ResultResponse, Sheet};
use core_runtime::config::{ClientConfig, ClientConfigBuilder};
use serde::Serialize;

use crate::error::{Result, SmartsheetError};

/// Typed client for the Smartsheet REST API.
///
/// Cheap to clone; clones share one executor. Every method takes an
/// `auth` override that replaces the configured access token for that call
/// only.
///
/// # Example
///
/// ```ignore
/// use provider_smartsheet::{SheetQuery, SmartsheetClient};
///
/// let client = SmartsheetClient::from_env()?;
/// let mut sheet = client.get_sheet(4583173393803140, &SheetQuery::new(), None).await?;
/// let status = sheet.rows[0].value_as_string("Status");
/// ```
#[derive(Clone)]
pub struct SmartsheetClient {
    executor: Arc<RequestExecutor>,
    options: CallOptions,
}

impl SmartsheetClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let executor = RequestExecutor::new(config)?;
        Ok(Self::from_executor(Arc::new(executor)))
    }

    /// Build from `SMARTSHEET_*` environment variables.
    ///
    /// Needs the `desktop-shims` feature for the default transport.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfigBuilder::from_env().build()?;
        Self::new(&config)
    }

    pub fn from_executor(executor: Arc<RequestExecutor>) -> Self {
        Self {
            executor,
            options: CallOptions::default(),
        }
    }

    /// Apply cancellation or a deadline to every call made through the
    /// returned client.
    pub fn with_call_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    pub(crate) fn call_options(&self) -> &CallOptions {
        &self.options
    }

    pub(crate) async fn get<T: ApiResult>(&self, path: &str, auth: Option<&str>) -> Result<T> {
        self.send(HttpMethod::Get, path, None::<&()>, auth).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B, auth: Option<&str>) -> Result<T>
    where
        T: ApiResult,
        B: Serialize + ?Sized + Sync,
    {
        self.send(HttpMethod::Post, path, Some(body), auth).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B, auth: Option<&str>) -> Result<T>
    where
        T: ApiResult,
        B: Serialize + ?Sized + Sync,
    {
        self.send(HttpMethod::Put, path, Some(body), auth).await
    }

    pub(crate) async fn delete<T: ApiResult>(&self, path: &str, auth: Option<&str>) -> Result<T> {
        self.send(HttpMethod::Delete, path, None::<&()>, auth).await
    }

    async fn send<T, B>(
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
        let value = self
            .executor
            .execute_with(method, path, body, auth, &self.options)
            .await?;
        Ok(value)
    }
}

impl fmt::Debug for SmartsheetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartsheetClient")
            .field("executor", &self.executor)
            .field("options", &self.options)
            .finish()
    }
}

// =============================================================================
// Argument checks
// =============================================================================

pub(crate) fn require_id(what: &str, id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(SmartsheetError::Validation(format!(
            "{} must be a positive id, got {}",
            what, id
        )));
    }
    Ok(id)
}

pub(crate) fn require_sheet_id(sheet: &Sheet) -> Result<i64> {
    match sheet.id {
        Some(id) => require_id("sheet id", id),
        None => Err(SmartsheetError::Validation(
            "Sheet has no id; fetch or create it first".to_string(),
        )),
    }
}

pub(crate) fn require_text<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SmartsheetError::Validation(format!(
            "{} cannot be blank",
            what
        )));
    }
    Ok(trimmed)
}

pub(crate) fn require_any<T>(what: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(SmartsheetError::Validation(format!(
            "At least one {} is required",
            what
        )));
    }
    Ok(())
}

pub(crate) fn into_result<T>(response: ResultResponse<T>, operation: &'static str) -> Result<T> {
    response
        .into_result()
        .ok_or(SmartsheetError::EmptyResult { operation })
}

// =============================================================================
// Query strings
// =============================================================================

/// Query string builder. Values are percent-encoded; list items are encoded
/// one by one and joined with literal commas.
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.pairs.push(format!(
            "{}={}",
            key,
            urlencoding::encode(&value.to_string())
        ));
        self
    }

    pub fn param_opt(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// `key=true`, or nothing when `set` is false.
    pub fn flag_if(self, key: &str, set: bool) -> Self {
        if set {
            self.param(key, true)
        } else {
            self
        }
    }

    pub fn list<I, S>(mut self, key: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        let joined = items
            .into_iter()
            .map(|item| urlencoding::encode(&item.to_string()).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        if !joined.is_empty() {
            self.pairs.push(format!("{}={}", key, joined));
        }
        self
    }

    pub fn finish(self, path: impl Into<String>) -> String {
        let path = path.into();
        if self.pairs.is_empty() {
            path
        } else {
            format!("{}?{}", path, self.pairs.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_rendering() {
        let path = Query::new()
            .param("loadAll", false)
            .list("include", ["comments", "attachments"])
            .flag_if("includeAll", true)
            .flag_if("skipped", false)
            .param_opt("paperSize", None::<&str>)
            .param("name", "a b&c")
            .finish("sheets/1/discussions");

        assert_eq!(
            path,
            "sheets/1/discussions?loadAll=false&include=comments,attachments&includeAll=true&name=a%20b%26c"
        );
    }

    #[test]
    fn test_empty_query_leaves_path() {
        assert_eq!(Query::new().list("ids", Vec::<i64>::new()).finish("sheets"), "sheets");
    }

    #[test]
    fn test_argument_checks() {
        assert_eq!(require_id("sheet id", 7).unwrap(), 7);
        assert!(matches!(
            require_id("sheet id", 0),
            Err(SmartsheetError::Validation(_))
        ));
        assert_eq!(require_text("name", "  Plan ").unwrap(), "Plan");
        assert!(require_text("name", " \t").is_err());
        assert!(require_any::<i64>("row id", &[]).is_err());
        assert!(require_sheet_id(&Sheet::default()).is_err());
    }

    #[test]
    fn test_into_result() {
        let response: ResultResponse<i64> =
            serde_json::from_str(r#"{"message": "SUCCESS", "resultCode": 0, "result": 5}"#)
                .unwrap();
        assert_eq!(into_result(response, "test").unwrap(), 5);

        let empty: ResultResponse<i64> =
            serde_json::from_str(r#"{"message": "SUCCESS", "resultCode": 0}"#).unwrap();
        assert!(matches!(
            into_result(empty, "test"),
            Err(SmartsheetError::EmptyResult { operation: "test" })
        ));
    }
}
