use bridge_traits::BridgeError;
use thiserror::Error;

/// Outcome of a call that did not produce a result.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-retryable status, surfaced on the attempt that received it.
    #[error("{}", describe_fatal(.status, .error_code, .message, .url))]
    Fatal {
        status: u16,
        error_code: Option<i64>,
        message: Option<String>,
        url: String,
    },

    #[error("Retries exceeded.  url:[{url}]")]
    RetriesExceeded { url: String, attempts: u32 },

    /// Bad caller input, raised before anything is sent.
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Could not parse response from {url}: {message}")]
    Deserialization { url: String, message: String },

    #[error("Could not serialize request body: {0}")]
    Serialization(String),

    #[error("Request cancelled. url:[{url}]")]
    Cancelled { url: String },

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_fatal(
    status: &u16,
    error_code: &Option<i64>,
    message: &Option<String>,
    url: &str,
) -> String {
    match error_code {
        Some(code) => format!(
            "HTTP Error {} - Smartsheet error code {}: {} url:[{}]",
            status,
            code,
            message.as_deref().unwrap_or_default(),
            url
        ),
        None => format!("HTTP Error {}: url:[{}]", status, url),
    }
}

impl ApiError {
    /// HTTP status of a fatal response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Fatal { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service error code of a fatal response.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            ApiError::Fatal { error_code, .. } => *error_code,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_message_with_code() {
        let err = ApiError::Fatal {
            status: 404,
            error_code: Some(1006),
            message: Some("Not Found".into()),
            url: "https://api.smartsheet.com/2.0/sheets/1".into(),
        };

        assert_eq!(
            err.to_string(),
            "HTTP Error 404 - Smartsheet error code 1006: Not Found url:[https://api.smartsheet.com/2.0/sheets/1]"
        );
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), Some(1006));
    }

    #[test]
    fn test_fatal_message_without_body() {
        let err = ApiError::Fatal {
            status: 502,
            error_code: None,
            message: None,
            url: "https://x/y".into(),
        };

        assert_eq!(err.to_string(), "HTTP Error 502: url:[https://x/y]");
    }

    #[test]
    fn test_retries_exceeded_message() {
        let err = ApiError::RetriesExceeded {
            url: "https://x/y".into(),
            attempts: 10,
        };
        assert_eq!(err.to_string(), "Retries exceeded.  url:[https://x/y]");
    }
}
