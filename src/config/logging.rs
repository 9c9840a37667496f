//! Logging Config

use clap::{Args, ValueEnum};

/// Crates whose chatter is capped at `warn` regardless of the chosen level.
const QUIET_DEPENDENCIES: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// How log lines are laid out on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One line per event
    Compact,

    /// Multi-line, indented events for reading at a terminal
    Pretty,

    /// Newline-delimited JSON for log shippers
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default log level or filter directive (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "log-level", env = "RUST_LOG", default_value = "warn")]
    pub level: String,

    /// Log line layout
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub format: LogFormat,

    /// Also log when each instrumented operation finishes, with its duration
    #[arg(long = "log-spans", env = "KIOSK_LOG_SPANS")]
    pub spans: bool,
}

impl LoggingConfig {
    /// Filter directives for the configured level, with HTTP internals capped.
    pub fn filter_directives(&self) -> String {
        QUIET_DEPENDENCIES
            .iter()
            .fold(self.level.trim().to_string(), |mut directives, krate| {
                directives.push_str(&format!(",{krate}=warn"));
                directives
            })
    }
}
