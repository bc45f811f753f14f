//! Logging configuration as a host sees it.

use std::sync::Arc;

use bridge_traits::log::{ConsoleLogger, LogLevel};
use core_runtime::logging::{
    redact_if_sensitive, LogFormat, LoggingConfig, LOG_FILTER_ENV, LOG_FORMAT_ENV,
};

#[test]
fn test_builder_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_redaction(false)
        .with_directives("provider_smartsheet=debug")
        .with_span_events(true)
        .with_sink(Arc::new(ConsoleLogger::default()));

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact);
    assert!(config.span_events);
    assert_eq!(config.directives.as_deref(), Some("provider_smartsheet=debug"));
    assert!(config.sink.is_some());
}

#[test]
fn test_defaults_redact_and_skip_spans() {
    let config = LoggingConfig::default();

    assert!(config.redact);
    assert!(!config.span_events);
    assert!(config.sink.is_none());
    assert_eq!(config.level, LogLevel::Info);

    #[cfg(debug_assertions)]
    assert_eq!(config.format, LogFormat::Pretty);
    #[cfg(not(debug_assertions))]
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn test_environment_overrides() {
    std::env::set_var(LOG_FILTER_ENV, "core_client=trace");
    std::env::set_var(LOG_FORMAT_ENV, "json");

    let config = LoggingConfig::from_env().unwrap();
    assert_eq!(config.directives.as_deref(), Some("core_client=trace"));
    assert_eq!(config.format, LogFormat::Json);

    std::env::set_var(LOG_FORMAT_ENV, "yaml");
    assert!(LoggingConfig::from_env().is_err());

    std::env::remove_var(LOG_FILTER_ENV);
    std::env::remove_var(LOG_FORMAT_ENV);
}

#[test]
fn test_credentials_never_pass() {
    assert_eq!(redact_if_sensitive("client_secret", "s3cr3t"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer x"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("hash", "DD32A276"), "[REDACTED]");
}

#[test]
fn test_identifiers_pass_through() {
    assert_eq!(redact_if_sensitive("sheet_id", "4583173393803140"), "4583173393803140");
    assert_eq!(redact_if_sensitive("url", "sheets/1/rows"), "sheets/1/rows");
    assert_eq!(redact_if_sensitive("result_code", "3"), "3");
}
