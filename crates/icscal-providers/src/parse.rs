//! Calendar parsing entry points.
//!
//! [`CalendarParser`] owns the [`IcsRules`] extractor and the options for one
//! run; [`parse_calendar`] and [`parse_calendar_content`] are one-shot
//! wrappers around it.

use std::io::Write;

use icscal_core::{AssembleOptions, Calendar, assemble};
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::ics::IcsRules;
use crate::source::{CalendarSource, FetchOptions};

/// Options for a full fetch-and-parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub assemble: AssembleOptions,
    pub fetch: FetchOptions,
}

impl ParseOptions {
    /// Builder method to set the repeat bound.
    pub fn with_max_repeats(mut self, max_repeats: usize) -> Self {
        self.assemble.max_repeats = max_repeats;
        self
    }
}

/// Reads and decodes calendar documents.
#[derive(Debug, Clone, Default)]
pub struct CalendarParser {
    rules: IcsRules,
    options: ParseOptions,
}

impl CalendarParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            rules: IcsRules::new(),
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Fetches `source` and decodes it.
    ///
    /// When `copy` is given, the raw document is written to it before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be fetched, the copy cannot be written,
    /// or an event carries a malformed timestamp.
    pub async fn parse(
        &self,
        source: &CalendarSource,
        copy: Option<&mut (dyn Write + Send)>,
    ) -> SourceResult<Calendar> {
        let content = source.fetch(&self.options.fetch).await?;

        if let Some(writer) = copy {
            writer
                .write_all(content.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(|e| {
                    SourceError::io(format!("failed to copy document: {e}"))
                        .with_location(source.to_string())
                        .with_source(e)
                })?;
        }

        self.parse_content(&content, &source.to_string())
    }

    /// Decodes an in-memory document; `location` is recorded as its URL.
    ///
    /// # Errors
    ///
    /// Fails when the text is not an iCalendar document, or when an event
    /// carries a malformed timestamp or lacks `DTSTART`.
    pub fn parse_content(&self, content: &str, location: &str) -> SourceResult<Calendar> {
        let document = self
            .rules
            .decode_document(content)
            .map_err(|e| e.with_location(location))?;
        debug!(location, blocks = document.events.len(), "Decoding calendar");
        assemble(&document, location, &self.options.assemble)
            .map_err(|e| SourceError::from(e).with_location(location))
    }
}

/// Fetches and decodes a calendar in one call.
///
/// # Errors
///
/// See [`CalendarParser::parse`].
pub async fn parse_calendar(
    source: &CalendarSource,
    options: ParseOptions,
    copy: Option<&mut (dyn Write + Send)>,
) -> SourceResult<Calendar> {
    CalendarParser::new(options).parse(source, copy).await
}

/// Decodes an in-memory document in one call.
///
/// # Errors
///
/// See [`CalendarParser::parse_content`].
pub fn parse_calendar_content(
    content: &str,
    location: &str,
    options: AssembleOptions,
) -> SourceResult<Calendar> {
    CalendarParser::new(ParseOptions {
        assemble: options,
        ..Default::default()
    })
    .parse_content(content, location)
}
