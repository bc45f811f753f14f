//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `provider-smartsheet`, `core-auth`). Host
//! applications can depend on `smartsheet-workspace` and enable the documented
//! features without needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use provider_smartsheet as smartsheet;

#[cfg(feature = "oauth")]
pub use core_auth as auth;
