//! Response envelopes and the [`ApiResult`] marker.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::attachment::{Attachment, Comment, Discussion};
use crate::cell::{Cell, CellHistory};
use crate::column::Column;
use crate::containers::{CrossSheetReference, Folder, Home, Report, Sight, Template, Workspace};
use crate::messaging::{MultiRowEmail, UpdateRequest};
use crate::row::{CopyOrMoveRowResult, Row};
use crate::sheet::Sheet;
use crate::user::{AlternateEmail, Group, GroupMember, Share, User};
use crate::webhook::Webhook;

/// `message` of a write that went through.
pub const SUCCESS_MESSAGE: &str = "SUCCESS";

/// Shapes a response body may be decoded into.
///
/// Implemented for every model type, the envelopes around them, lists of
/// them and a few scalars. Asking the executor for anything else fails to
/// compile.
pub trait ApiResult: DeserializeOwned + Send + 'static {}

impl<T: ApiResult> ApiResult for Vec<T> {}
impl<T: ApiResult> ApiResult for ResultResponse<T> {}
impl<T: ApiResult> ApiResult for IndexResultResponse<T> {}
impl ApiResult for i64 {}
impl ApiResult for String {}
impl ApiResult for serde_json::Value {}

macro_rules! api_results {
    ($($ty:ty),* $(,)?) => {
        $(impl ApiResult for $ty {})*
    };
}

api_results!(
    Sheet,
    Row,
    Column,
    Cell,
    CellHistory,
    Attachment,
    Discussion,
    Comment,
    User,
    AlternateEmail,
    Group,
    GroupMember,
    Share,
    Workspace,
    Folder,
    Report,
    Template,
    Sight,
    Home,
    Webhook,
    CrossSheetReference,
    UpdateRequest,
    MultiRowEmail,
    CopyOrMoveRowResult,
    ErrorResponse,
);

/// Error body. Every field is optional so that any JSON object parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl ErrorResponse {
    /// Best-effort parse; `None` when the body is not a JSON object.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

/// Envelope returned by write endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default = "Vec::new")]
    pub failed_items: Vec<BulkItemFailure>,
}

impl<T> ResultResponse<T> {
    pub fn is_success(&self) -> bool {
        self.message.as_deref() == Some(SUCCESS_MESSAGE)
    }

    pub fn into_result(self) -> Option<T> {
        self.result
    }
}

/// Envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResultResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_parsed_tolerantly() {
        let body = br#"{"errorCode": 4003, "message": "Rate limit", "refId": "x1"}"#;
        let full = ErrorResponse::parse(body).unwrap();
        assert_eq!(full.error_code, Some(4003));

        let partial = ErrorResponse::parse(br#"{"detail": "nope"}"#).unwrap();
        assert!(partial.error_code.is_none());

        assert!(ErrorResponse::parse(b"<html>Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_result_envelope() {
        let response: ResultResponse<Vec<i64>> = serde_json::from_str(
            r#"{"message": "SUCCESS", "resultCode": 0, "result": [1, 2], "version": 12}"#,
        )
        .unwrap();

        assert!(response.is_success());
        assert!(response.failed_items.is_empty());
        assert_eq!(response.into_result(), Some(vec![1, 2]));
    }

    #[test]
    fn test_partial_success_keeps_failed_items() {
        let response: ResultResponse<Vec<Row>> = serde_json::from_str(
            r#"{"message": "PARTIAL_SUCCESS", "resultCode": 3,
                "failedItems": [{"index": 1, "error": {"errorCode": 1036, "message": "bad"}}]}"#,
        )
        .unwrap();

        assert!(!response.is_success());
        assert_eq!(
            response.failed_items[0].error.as_ref().and_then(|e| e.error_code),
            Some(1036)
        );
    }

    #[test]
    fn test_index_envelope() {
        let page: IndexResultResponse<Sheet> = serde_json::from_str(
            r#"{"pageNumber": 1, "totalCount": 2, "data": [{"id": 1}, {"id": 2}]}"#,
        )
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total_count, Some(2));
    }
}
