//! Logging subscriber initialisation.
//!
//! Every log line goes to stderr; stdout is reserved for command output.

use std::io;

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::format::FmtSpan,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, logging::LoggingConfig};

/// Errors raised while initialising logging.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber was already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let spans = span_events(config);
    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_span_events(spans);

    match config.format {
        LogFormat::Compact => install(config, base.compact().with_target(false)),
        LogFormat::Pretty => install(config, base.pretty()),
        LogFormat::Json => install(
            config,
            base.json().with_current_span(true).with_span_list(false),
        ),
    }
}

fn span_events(config: &LoggingConfig) -> FmtSpan {
    if config.spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// `RUST_LOG` wins when it holds a valid filter; otherwise the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_invalid| EnvFilter::new(config.filter_directives()))
}

fn install<L>(config: &LoggingConfig, layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(config))
        .try_init()?;

    Ok(())
}
