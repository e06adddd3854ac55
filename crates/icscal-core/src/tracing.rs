//! Log output for the `icscal` binary.
//!
//! Logs always go to stderr so stdout carries only the rendered calendar.
//! `RUST_LOG` overrides the level unless an explicit filter is configured.
//!
//! ```ignore
//! use icscal_core::tracing::{init_tracing, TracingConfig, TracingOutputFormat};
//!
//! init_tracing(TracingConfig::for_cli(false, TracingOutputFormat::Json))?;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("logging already initialised: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log line layout, as named in `config.toml` (`pretty`, `compact`, `json`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingOutputFormat {
    #[default]
    Pretty,
    Compact,
    /// One object per line.
    Json,
}

/// What to log and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level used when neither `filter` nor `RUST_LOG` is set.
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Explicit filter directive; takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Warnings only in the configured format, or compact debug output when
    /// `debug` is set.
    #[must_use]
    pub fn for_cli(debug: bool, format: TracingOutputFormat) -> Self {
        if debug {
            Self {
                level: Level::DEBUG,
                format: TracingOutputFormat::Compact,
                filter: None,
            }
        } else {
            Self {
                level: Level::WARN,
                format,
                filter: None,
            }
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(self.level)))),
        }
    }
}

/// Returns the filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: Level) -> String {
    format!("icscal={level}")
}

/// Installs the global subscriber.
///
/// Debug output (and anything more verbose) includes file and line.
///
/// # Errors
///
/// Fails if a global subscriber is already set or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let verbose = config.level >= Level::DEBUG;

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(verbose)
        .with_line_number(verbose);
    let layer = match config.format {
        TracingOutputFormat::Pretty => layer.pretty().boxed(),
        TracingOutputFormat::Compact => layer.compact().without_time().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(filter).with(layer),
    )?;
    Ok(())
}
