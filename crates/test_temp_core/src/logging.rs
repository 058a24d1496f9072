//! Tracing setup for test binaries.
//!
//! The manager logs through [`tracing`]; this module installs a subscriber
//! that writes through the test harness's captured output. Installation uses
//! `try_init`, so any number of tests may ask for it and only the first one
//! wins.
//!
//! # Example
//!
//! ```
//! use test_temp_core::logging::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("test_temp_core=trace")
//!     .init();
//! ```

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an env-filter directive for test runs.
pub const LOG_ENV: &str = "TEST_TEMP_LOG";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Compact single-line output (default).
    #[default]
    Compact,
    /// JSON structured output.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the test subscriber.
#[derive(Debug, Clone)]
pub struct TracingSetup {
    /// Maximum log level, used when no filter is given.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "`test_temp_core=debug`").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Compact,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a setup with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a setup whose filter comes from [`LOG_ENV`], if set.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(LOG_ENV) {
            Ok(filter) if !filter.trim().is_empty() => Self::new().with_env_filter(filter),
            _ => Self::new(),
        }
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Installs the subscriber. Returns `false` if one was already installed.
    pub fn init(&self) -> bool {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = match self.format {
            TracingFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_test_writer()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_test_writer()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_test_writer()
                        .with_span_events(span_events),
                )
                .try_init(),
        }
        .is_ok();

        if installed {
            tracing::debug!(
                level = %self.level,
                format = ?self.format,
                "test tracing initialized"
            );
        }
        installed
    }
}

/// Installs the [`LOG_ENV`] subscriber once per process, if the variable is set.
pub fn init_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if std::env::var_os(LOG_ENV).is_some() {
            TracingSetup::from_env().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_compact() {
        assert_eq!(TracingFormat::default(), TracingFormat::Compact);
    }

    #[test]
    fn default_level_is_info() {
        assert_eq!(TracingSetup::default().level, Level::INFO);
    }

    #[test]
    fn builder_sets_fields() {
        let setup = TracingSetup::new()
            .with_level(Level::TRACE)
            .with_format(TracingFormat::Json)
            .with_env_filter("test_temp_core=debug")
            .with_span_events(true);

        assert_eq!(setup.level, Level::TRACE);
        assert_eq!(setup.format, TracingFormat::Json);
        assert_eq!(setup.env_filter.as_deref(), Some("test_temp_core=debug"));
        assert!(setup.span_events);
    }

    #[test]
    fn second_init_is_harmless() {
        TracingSetup::new().init();
        assert!(!TracingSetup::new().init());
    }
}
