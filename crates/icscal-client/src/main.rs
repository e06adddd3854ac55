//! icscal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use icscal_core::{TracingConfig, init_tracing};
use tracing::debug;

use icscal_client::cli::{Cli, Command, ConfigAction};
use icscal_client::commands::show::{self, ShowSettings};
use icscal_client::commands::config as config_cmd;
use icscal_client::config::ClientConfig;
use icscal_client::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().map_err(ClientError::Config)?,
    };

    let tracing = TracingConfig::for_cli(cli.debug || config.debug, config.logging.format)
        .with_filter(config.logging.filter.clone());
    init_tracing(tracing).map_err(|e| ClientError::Config(e.to_string()))?;
    debug!(?config, "Configuration loaded");

    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);

    match cli.command {
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => config_cmd::dump(&config, &config_path),
            ConfigAction::Path => config_cmd::path(&config_path),
        },
        None => {
            let settings = ShowSettings::resolve(&cli, &config)?;
            show::run(&settings).await
        }
    }
}
