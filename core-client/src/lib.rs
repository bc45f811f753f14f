//! # Core Client
//!
//! The request-execution engine behind every Smartsheet API call.
//!
//! - [`RequestExecutor`] attaches auth and change-agent headers, sends,
//!   classifies and retries with backoff up to the configured attempt limit
//! - [`classify`](classify::classify) and [`next_wait`](backoff::next_wait)
//!   hold the retry policy
//! - [`FormFile`] and [`RequestExecutor::upload_bytes`] cover binary uploads
//! - [`CallOptions`] carries cancellation and deadlines
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::HttpMethod;
//! use core_client::RequestExecutor;
//! use core_models::User;
//!
//! let executor = RequestExecutor::new(&config)?;
//! let me: User = executor
//!     .execute(HttpMethod::Get, "users/me", None::<&()>, None)
//!     .await?;
//! ```

pub mod backoff;
pub mod classify;
pub mod error;
pub mod executor;
pub mod upload;

pub use error::{ApiError, Result};
pub use executor::{CallOptions, RequestExecutor, CHANGE_AGENT_HEADER};
pub use upload::FormFile;

pub use core_models::{ApiResult, ErrorResponse, IndexResultResponse, ResultResponse};
pub use tokio_util::sync::CancellationToken;
