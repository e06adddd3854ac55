//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/icscal/config.toml` by default. Command-line flags override
//! the values read here.

use std::path::{Path, PathBuf};

use icscal_core::{DEFAULT_MAX_REPEATS, TracingOutputFormat};
use serde::{Deserialize, Serialize};

/// Configuration for the icscal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Default calendar location, used when no SOURCE is given.
    pub source: Option<String>,

    /// Recurrence expansion settings.
    pub expansion: ExpansionSettings,

    /// Display settings.
    pub display: DisplaySettings,

    /// Remote fetch settings.
    pub fetch: FetchSettings,

    /// Log output settings.
    pub logging: LoggingSettings,
}

/// Recurrence expansion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSettings {
    /// Occurrences generated per recurring event; 0 disables expansion.
    pub max_repeats: usize,

    /// Fallback timezone (IANA name) for unknown TZIDs.
    pub timezone: Option<String>,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            max_repeats: DEFAULT_MAX_REPEATS,
            timezone: None,
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Print JSON instead of text.
    pub json: bool,

    /// Maximum number of events to display.
    pub limit: Option<usize>,

    /// Maximum summary length (truncated with ellipsis).
    pub max_title_length: Option<usize>,

    /// Text to show when the calendar has no events.
    pub no_events_text: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            json: false,
            limit: None,
            max_title_length: None,
            no_events_text: "No events".to_string(),
        }
    }
}

/// Remote fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Request timeout in seconds.
    pub timeout: u64,

    /// Custom user agent.
    pub user_agent: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `pretty`, `compact` or `json`.
    pub format: TracingOutputFormat,

    /// Filter directive such as `icscal_core=trace`; overrides `RUST_LOG`.
    pub filter: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icscal")
    }
}
