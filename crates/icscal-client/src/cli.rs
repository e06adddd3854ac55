//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// icscal - Decode iCalendar feeds and list their events
#[derive(Debug, Parser)]
#[command(name = "icscal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ICSCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Calendar file path or http(s) URL
    pub source: Option<String>,

    // --- Output flags ---
    /// Output the calendar as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of events to display
    #[arg(long)]
    pub limit: Option<usize>,

    /// Maximum summary length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,

    /// Write a copy of the raw document to this path
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    // --- Expansion flags ---
    /// Upper bound on occurrences generated per recurring event (0 disables expansion)
    #[arg(long, env = "ICSCAL_MAX_REPEATS")]
    pub max_repeats: Option<usize>,

    /// Fallback timezone for unknown TZIDs (IANA name)
    #[arg(long, env = "ICSCAL_TIMEZONE")]
    pub timezone: Option<String>,

    // --- Fetch flags ---
    /// Request timeout in seconds for remote calendars
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format requested on the command line, if any.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.json.then_some(OutputFormat::Json)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
