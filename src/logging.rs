use std::env;
use std::io;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("log tracer already initialized")]
    LogTracerAlreadyInitialized,
    #[error("global tracing subscriber already set")]
    SubscriberAlreadySet,
}

/// Builder for the process-wide tracing subscriber.
///
/// Everything is written to stderr; stdout is reserved for lookup output.
pub struct LoggingBuilder {
    application: String,
    version: String,
    json_enabled: bool,
}

impl LoggingBuilder {
    pub fn new(application: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            version: version.into(),
            json_enabled: false,
        }
    }

    pub fn json_enabled(mut self, enabled: bool) -> Self {
        self.json_enabled = enabled;
        self
    }

    /// Read JSON_LOG env var to determine if JSON should be enabled
    pub fn json_from_env(self) -> Self {
        let enabled = json_flag(env::var("JSON_LOG").ok().as_deref());
        self.json_enabled(enabled)
    }

    pub fn init(self) -> Result<Option<WorkerGuard>, SetupError> {
        // rustls reports through the `log` crate
        LogTracer::init().map_err(|_| SetupError::LogTracerAlreadyInitialized)?;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let guard = if self.json_enabled {
            let (non_blocking, guard) = tracing_appender::non_blocking(io::stderr());
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(non_blocking);
            let subscriber = Registry::default().with(filter).with(layer);
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|_| SetupError::SubscriberAlreadySet)?;
            Some(guard)
        } else {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|_| SetupError::SubscriberAlreadySet)?;
            None
        };

        tracing::debug!(
            application = %self.application,
            version = %self.version,
            json = self.json_enabled,
            "Logger initialized"
        );
        Ok(guard)
    }
}

fn json_flag(value: Option<&str>) -> bool {
    value.is_some_and(|s| s.parse().unwrap_or_default())
}
