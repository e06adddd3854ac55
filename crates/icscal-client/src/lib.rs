//! CLI, configuration and output rendering
//!
//! This crate provides the `icscal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use output::{CalendarFormatter, OutputFormat, OutputOptions};
