//! # Host Bridge Traits
//!
//! Seams between the Smartsheet client and its environment.
//!
//! ## Overview
//!
//! The client never talks to the network or to a log backend directly. It
//! goes through the traits defined here so that hosts can swap transports and
//! tests can script responses without a server.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - One HTTP exchange per call, no retry
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert their own failures into it and say whether the failure is
//! transient (timeout, connection reset) so the executor can resend.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single transport can be shared
//! behind an `Arc` by concurrent calls.
//!
//! ## Examples
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct ScriptedClient {
//!     responses: std::sync::Mutex<Vec<HttpResponse>>,
//! }
//!
//! #[async_trait]
//! impl HttpClient for ScriptedClient {
//!     async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
//!         Ok(self.responses.lock().unwrap().remove(0))
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod log;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
