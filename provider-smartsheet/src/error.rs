//! Error types for the Smartsheet client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartsheetError {
    /// A required argument was missing or malformed. Raised before any
    /// request is sent.
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// The write went through but the envelope carried no result.
    #[error("Response to {operation} carried no result")]
    EmptyResult { operation: &'static str },

    #[error(transparent)]
    Api(#[from] core_client::ApiError),

    #[error(transparent)]
    Model(#[from] core_models::ModelError),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, SmartsheetError>;

impl SmartsheetError {
    /// HTTP status of a fatal API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            SmartsheetError::Api(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SmartsheetError::Api(err) if err.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_client::ApiError;

    #[test]
    fn test_error_display() {
        let error = SmartsheetError::Validation("sheet id must be positive".to_string());
        assert_eq!(error.to_string(), "Invalid argument: sheet id must be positive");

        let error = SmartsheetError::EmptyResult {
            operation: "create_sheet",
        };
        assert_eq!(error.to_string(), "Response to create_sheet carried no result");
    }

    #[test]
    fn test_api_error_passthrough() {
        let error: SmartsheetError = ApiError::Fatal {
            status: 404,
            error_code: Some(1006),
            message: Some("Not Found".to_string()),
            url: "https://api.smartsheet.com/2.0/sheets/1".to_string(),
        }
        .into();

        assert_eq!(error.status(), Some(404));
        assert!(error.is_not_found());
        assert!(error.to_string().starts_with("HTTP Error 404"));
    }
}
