//! # Core Runtime Module
//!
//! Foundational infrastructure shared by every client crate:
//! - Client configuration (credentials, base URL, retry ceiling, transport)
//! - Logging and tracing setup
//!
//! ## Overview
//!
//! Nothing in here talks to the API. The request executor and the endpoint
//! layer read a [`ClientConfig`](config::ClientConfig) built here, and hosts
//! call [`init_logging`](logging::init_logging) once at startup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
