//! # Tracing Subscriber Setup
//!
//! The client crates only emit `tracing` events: one per request attempt, one
//! per retry decision, one per bulk chunk. Nothing is printed until the host
//! calls [`init_logging`], which installs a single global subscriber made of
//! three layers:
//!
//! 1. an [`EnvFilter`] (the client crates at the configured level, everything
//!    else at `warn`)
//! 2. a `fmt` layer writing to stderr in the chosen [`LogFormat`]
//! 3. a forwarder that copies surviving events into a [`LoggerSink`], when
//!    the host supplies one
//!
//! Field values headed for the sink go through [`redact_if_sensitive`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use bridge_traits::log::{ConsoleLogger, LogLevel};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::from_env()?
//!     .with_level(LogLevel::Debug)
//!     .with_sink(Arc::new(ConsoleLogger::default()));
//!
//! init_logging(config)?;
//! ```

use std::env;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{Error, Result};

/// Full filter directives, e.g. `core_client=trace,reqwest=debug`.
pub const LOG_FILTER_ENV: &str = "SMARTSHEET_LOG";
/// `pretty`, `json` or `compact`.
pub const LOG_FORMAT_ENV: &str = "SMARTSHEET_LOG_FORMAT";

const REDACTED: &str = "[REDACTED]";

/// Targets that follow the configured level.
const CLIENT_TARGETS: &[&str] = &[
    "smartsheet_workspace",
    "bridge_desktop",
    "core_runtime",
    "core_models",
    "core_client",
    "core_auth",
    "provider_smartsheet",
];

/// Output format of the stderr layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored
    Pretty,
    /// One JSON object per event
    Json,
    /// One line per event
    Compact,
}

impl Default for LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(Error::Config(format!("Unknown log format: {}", other))),
        }
    }
}

#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level for the client crates when no directives are given
    pub level: LogLevel,
    /// `EnvFilter` directives replacing the level-based default
    pub directives: Option<String>,
    pub sink: Option<Arc<dyn LoggerSink>>,
    /// Pass sink-bound field values through [`redact_if_sensitive`]
    pub redact: bool,
    /// Emit an event when an instrumented call opens and closes
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            directives: None,
            sink: None,
            redact: true,
            span_events: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("directives", &self.directives)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .field("redact", &self.redact)
            .field("span_events", &self.span_events)
            .finish()
    }
}

impl LoggingConfig {
    /// Defaults overridden by [`LOG_FILTER_ENV`] and [`LOG_FORMAT_ENV`].
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(directives) = env::var(LOG_FILTER_ENV).ok().filter(|v| !v.trim().is_empty()) {
            config.directives = Some(directives);
        }
        if let Ok(format) = env::var(LOG_FORMAT_ENV) {
            config.format = format.parse()?;
        }

        Ok(config)
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }
}

/// Install the global subscriber.
///
/// Fails if the directives do not parse or a global subscriber is already
/// set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = env_filter(&config)?;
    let forwarder = config.sink.clone().map(|sink| SinkForwarder {
        sink,
        redact: config.redact,
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config))
        .with(forwarder)
        .try_init()
        .map_err(|e| Error::Config(format!("Logging already initialized: {}", e)))
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = config
        .directives
        .clone()
        .unwrap_or_else(|| default_directives(config.level));

    EnvFilter::builder()
        .parse(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

fn default_directives(level: LogLevel) -> String {
    std::iter::once("warn".to_string())
        .chain(
            CLIENT_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level.as_str())),
        )
        .collect::<Vec<_>>()
        .join(",")
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let spans = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_span_events(spans);

    match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

// =============================================================================
// Sink forwarding
// =============================================================================

struct SinkForwarder {
    sink: Arc<dyn LoggerSink>,
    redact: bool,
}

impl<S> Layer<S> for SinkForwarder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = to_log_level(*metadata.level());
        if level < self.sink.min_level() {
            return;
        }

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let message = fields
            .message
            .take()
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);

        for (name, value) in fields.values {
            let value = if self.redact {
                redact_if_sensitive(&name, &value)
            } else {
                value
            };
            entry = entry.with_field(name, value);
        }
        if let Some(span) = ctx.event_span(event) {
            entry = entry.with_span(span.name());
        }

        deliver(Arc::clone(&self.sink), entry);
    }
}

/// Hand the entry to the sink without blocking a runtime worker.
fn deliver(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("Log sink failed: {}", err);
                }
            });
        }
        Err(_) => {
            if let Err(err) = futures::executor::block_on(sink.log(entry)) {
                eprintln!("Log sink failed: {}", err);
            }
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => self.values.push((name.to_string(), value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

fn to_log_level(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::ERROR => LogLevel::Error,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::TRACE => LogLevel::Trace,
    }
}

// =============================================================================
// Redaction
// =============================================================================

/// Field-name fragments that mark a credential.
const SECRET_MARKERS: &[&str] = &[
    "token",
    "secret",
    "password",
    "authorization",
    "api_key",
    "hash",
];

/// Mask a field value before it leaves the process.
///
/// Credential-named fields (tokens, secrets, the OAuth `hash` and `code`)
/// are replaced outright. Otherwise a `Bearer` value loses its token and an
/// email address keeps only its first character.
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let name = field_name.to_ascii_lowercase();
    if name == "code" || SECRET_MARKERS.iter().any(|marker| name.contains(marker)) {
        return REDACTED.to_string();
    }

    if value.starts_with("Bearer ") {
        return format!("Bearer {}", REDACTED);
    }

    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !value.contains(char::is_whitespace) =>
        {
            let initial: String = local.chars().take(1).collect();
            format!("{}***@{}", initial, REDACTED)
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<LogEntry>>,
    }

    #[async_trait]
    impl LoggerSink for RecordingSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }
    }

    #[test]
    fn test_default_directives() {
        let directives = default_directives(LogLevel::Debug);

        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("core_client=debug"));
        assert!(directives.contains("provider_smartsheet=debug"));
        assert!(!directives.contains("reqwest"));
    }

    #[test]
    fn test_custom_directives_replace_default() {
        let config = LoggingConfig::default().with_directives("core_auth=trace");
        let filter = env_filter(&config).unwrap();
        assert!(filter.to_string().contains("core_auth=trace"));
    }

    #[test]
    fn test_invalid_directives_are_rejected() {
        let config = LoggingConfig::default().with_directives("core_client=[");
        assert!(matches!(env_filter(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_redaction() {
        assert_eq!(redact_if_sensitive("access_token", "ll352u9j"), REDACTED);
        assert_eq!(redact_if_sensitive("code", "abc"), REDACTED);
        assert_eq!(redact_if_sensitive("error_code", "4003"), "4003");
        assert_eq!(
            redact_if_sensitive("header", "Bearer ll352u9j"),
            "Bearer [REDACTED]"
        );
        assert_eq!(
            redact_if_sensitive("recipient", "pm@example.com"),
            "p***@[REDACTED]"
        );
        assert_eq!(redact_if_sensitive("title", "Q3 @ HQ. Plan"), "Q3 @ HQ. Plan");
    }

    #[test]
    fn test_forwarder_filters_and_redacts() {
        let sink = Arc::new(RecordingSink::default());
        let forwarder = SinkForwarder {
            sink: sink.clone(),
            redact: true,
        };
        let subscriber = tracing_subscriber::registry().with(forwarder);

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "core_client::executor", "sending");
            tracing::warn!(
                target: "core_client::executor",
                status = 503u16,
                error_code = 4003i64,
                refresh_token = "r-1",
                "Retrying request"
            );
        });

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "Retrying request");
        assert_eq!(entry.fields.get("status").map(String::as_str), Some("503"));
        assert_eq!(entry.fields.get("error_code").map(String::as_str), Some("4003"));
        assert_eq!(
            entry.fields.get("refresh_token").map(String::as_str),
            Some(REDACTED)
        );
    }
}
