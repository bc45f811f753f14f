//! Errors raised while assembling a client configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A setting is missing, malformed or out of range.
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// The host did not provide something the client cannot run without.
    #[error("No {capability} available: {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The default transport could not be constructed.
    #[error("HTTP transport setup failed: {0}")]
    TransportSetup(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_setting() {
        let err = Error::Config("Attempt limit must be between 1 and 50, got 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid client configuration: Attempt limit must be between 1 and 50, got 0"
        );

        let err = Error::CapabilityMissing {
            capability: "HttpClient".into(),
            message: "inject one with .http_client()".into(),
        };
        assert_eq!(
            err.to_string(),
            "No HttpClient available: inject one with .http_client()"
        );
    }
}
