use core_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth credentials missing: {0}")]
    MissingCredentials(String),

    #[error("Authorization code cannot be empty")]
    MissingCode,

    #[error("Refresh token cannot be empty")]
    MissingRefreshToken,

    #[error("Invalid authorization URL: {0}")]
    InvalidAuthUrl(String),

    #[error("Failed to encode token request: {0}")]
    Encoding(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
