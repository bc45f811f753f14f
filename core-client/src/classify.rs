//! Response classification.

use std::time::Duration;

/// Rate limit exceeded.
pub const RATE_LIMITED: i64 = 4001;
/// Server timeout.
pub const SERVER_TIMEOUT: i64 = 4002;
/// Too many simultaneous requests.
pub const CONCURRENCY_LIMIT: i64 = 4003;
/// Simultaneous updates to the same object.
pub const SIMULTANEOUS_UPDATE: i64 = 4004;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    /// Try again. `floor` is the wait to start from when the error code
    /// calls for backing off; `None` retries without changing the wait.
    Retry { floor: Option<Duration> },
    Fatal,
}

/// Decide what to do with a response.
pub fn classify(status: u16, error_code: Option<i64>) -> Classification {
    match status {
        200 => Classification::Success,
        429 | 500 | 503 => Classification::Retry {
            floor: error_code.and_then(backoff_floor),
        },
        _ => Classification::Fatal,
    }
}

/// Starting wait for an error code that warrants backing off.
pub fn backoff_floor(error_code: i64) -> Option<Duration> {
    match error_code {
        RATE_LIMITED => Some(Duration::from_secs(60)),
        SERVER_TIMEOUT | SIMULTANEOUS_UPDATE => Some(Duration::from_secs(1)),
        CONCURRENCY_LIMIT => Some(Duration::from_secs(2)),
        _ => None,
    }
}

/// Statuses that are retried whatever their body says.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        assert_eq!(classify(200, None), Classification::Success);
    }

    #[test]
    fn test_retry_floors() {
        assert_eq!(
            classify(429, Some(4001)),
            Classification::Retry {
                floor: Some(Duration::from_secs(60))
            }
        );
        assert_eq!(
            classify(503, Some(4003)),
            Classification::Retry {
                floor: Some(Duration::from_secs(2))
            }
        );
        assert_eq!(
            classify(500, Some(4004)),
            Classification::Retry {
                floor: Some(Duration::from_secs(1))
            }
        );
    }

    #[test]
    fn test_unknown_code_retries_without_floor() {
        assert_eq!(
            classify(500, Some(4000)),
            Classification::Retry { floor: None }
        );
        assert_eq!(classify(503, None), Classification::Retry { floor: None });
    }

    #[test]
    fn test_everything_else_is_fatal() {
        for status in [201, 400, 401, 403, 404, 409, 502, 504] {
            assert_eq!(classify(status, Some(4003)), Classification::Fatal);
        }
        assert!(!is_retryable_status(404));
    }
}
