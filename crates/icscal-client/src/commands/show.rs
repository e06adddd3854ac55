//! The default command: fetch a calendar and print its events.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use icscal_core::AssembleOptions;
use icscal_core::time::lookup_zone;
use icscal_providers::{CalendarParser, CalendarSource, FetchOptions, ParseOptions};
use tracing::info;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::output::{CalendarFormatter, OutputFormat, OutputOptions};

/// Everything needed for one run, with CLI flags applied over the config.
#[derive(Debug, Clone)]
pub struct ShowSettings {
    pub source: CalendarSource,
    pub parse: ParseOptions,
    pub format: OutputFormat,
    pub output: OutputOptions,
    /// Where to copy the raw document, if anywhere.
    pub dump: Option<PathBuf>,
}

impl ShowSettings {
    /// Merges command-line flags over the configuration.
    pub fn resolve(cli: &Cli, config: &ClientConfig) -> ClientResult<Self> {
        let location = cli
            .source
            .as_deref()
            .or(config.source.as_deref())
            .ok_or_else(|| {
                ClientError::Config(
                    "no calendar given: pass SOURCE or set `source` in config.toml".to_string(),
                )
            })?;
        let source = CalendarSource::parse(location)?;

        let default_timezone = match cli.timezone.as_deref().or(config.expansion.timezone.as_deref())
        {
            Some(name) => lookup_zone(name).map_err(|e| ClientError::Config(e.to_string()))?,
            None => Tz::UTC,
        };
        let assemble = AssembleOptions {
            max_repeats: cli.max_repeats.unwrap_or(config.expansion.max_repeats),
            default_timezone,
        };

        let timeout = Duration::from_secs(cli.timeout.unwrap_or(config.fetch.timeout));
        let mut fetch = FetchOptions::default().with_timeout(timeout);
        if let Some(ref user_agent) = config.fetch.user_agent {
            fetch = fetch.with_user_agent(user_agent);
        }

        let format = cli.output_format().unwrap_or(if config.display.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tty
        });

        Ok(Self {
            source,
            parse: ParseOptions { assemble, fetch },
            format,
            output: OutputOptions {
                limit: cli.limit.or(config.display.limit),
                max_title_length: cli.max_title_length.or(config.display.max_title_length),
                no_events_text: config.display.no_events_text.clone(),
            },
            dump: cli.dump.clone(),
        })
    }
}

/// Fetches, decodes and renders the calendar.
pub async fn render(settings: &ShowSettings) -> ClientResult<String> {
    let parser = CalendarParser::new(settings.parse.clone());

    let mut document: Vec<u8> = Vec::new();
    let copy: Option<&mut (dyn Write + Send)> = if settings.dump.is_some() {
        Some(&mut document)
    } else {
        None
    };
    let parsed = parser.parse(&settings.source, copy).await;

    // an existing dump target is only replaced once the document was fetched
    if let Some(ref path) = settings.dump
        && (parsed.is_ok() || !document.is_empty())
    {
        fs::write(path, &document)?;
    }
    let calendar = parsed?;

    info!(
        source = %settings.source,
        events = calendar.events.len(),
        "Calendar loaded"
    );

    CalendarFormatter::new(settings.output.clone()).render(&calendar, settings.format)
}

/// Runs the command, printing to stdout.
pub async fn run(settings: &ShowSettings) -> ClientResult<()> {
    let rendered = render(settings).await?;
    println!("{}", rendered);
    Ok(())
}
