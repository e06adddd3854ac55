//! Output rendering.
//!
//! Renders a decoded [`Calendar`] either as plain text (one line per event)
//! or as JSON.
//!
//! Text times are shown in the calendar's timezone. Whole-day events keep
//! their own dates.

use std::borrow::Cow;

use chrono::Duration;
use icscal_core::{Calendar, Event};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// The output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Tty,
    /// Machine-readable JSON.
    Json,
}

/// Options for rendering.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Maximum number of events to render.
    pub limit: Option<usize>,
    /// Maximum summary length (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Text shown when there are no events.
    pub no_events_text: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            limit: None,
            max_title_length: None,
            no_events_text: "No events".to_string(),
        }
    }
}

/// Renders calendars.
#[derive(Debug, Clone, Default)]
pub struct CalendarFormatter {
    options: OutputOptions,
}

impl CalendarFormatter {
    pub fn new(options: OutputOptions) -> Self {
        Self { options }
    }

    /// Renders `calendar` in the given format.
    pub fn render(&self, calendar: &Calendar, format: OutputFormat) -> ClientResult<String> {
        match format {
            OutputFormat::Tty => Ok(self.format_tty(calendar)),
            OutputFormat::Json => self.format_json(calendar),
        }
    }

    /// Formats the header followed by one line per event.
    pub fn format_tty(&self, calendar: &Calendar) -> String {
        let mut lines = Vec::new();

        let title = if calendar.name.is_empty() {
            calendar.url.as_str()
        } else {
            calendar.name.as_str()
        };
        if calendar.description.is_empty() {
            lines.push(title.to_string());
        } else {
            lines.push(format!("{} - {}", title, calendar.description));
        }
        lines.push(format!(
            "timezone: {}  version: {}  events: {}",
            calendar.timezone,
            calendar.version,
            calendar.events.len()
        ));
        lines.push(String::new());

        let events = self.visible(&calendar.events);
        if events.is_empty() {
            lines.push(self.options.no_events_text.clone());
        }
        for event in events {
            lines.push(self.format_event(event, calendar));
        }

        lines.join("\n")
    }

    /// Serialises the calendar, keeping only the visible events.
    pub fn format_json(&self, calendar: &Calendar) -> ClientResult<String> {
        let mut shown = calendar.clone();
        shown.events = self.visible(&calendar.events).to_vec();
        serde_json::to_string_pretty(&shown)
            .map_err(|e| ClientError::Output(format!("failed to serialize calendar: {}", e)))
    }

    fn visible<'a>(&self, events: &'a [Event]) -> &'a [Event] {
        match self.options.limit {
            Some(limit) => &events[..limit.min(events.len())],
            None => events,
        }
    }

    fn format_event(&self, event: &Event, calendar: &Calendar) -> String {
        let summary = self.truncate_title(&event.summary);

        let when = if event.whole_day {
            let first = event.start.date_naive();
            // DTEND of a whole-day event is exclusive
            let last = (event.end - Duration::seconds(1)).date_naive().max(first);
            if first == last {
                format!("{} (all day)", first.format("%Y-%m-%d"))
            } else {
                format!("{} → {} (all day)", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
            }
        } else {
            let start = event.start.with_timezone(&calendar.timezone);
            let end = event.end.with_timezone(&calendar.timezone);
            let end_format = if end.date_naive() == start.date_naive() {
                "%H:%M"
            } else {
                "%Y-%m-%d %H:%M"
            };
            format!("{} → {}", start.format("%Y-%m-%d %H:%M"), end.format(end_format))
        };

        let marker = if event.is_override() { " (moved)" } else { "" };
        format!("{}  {} [{}]{}", when, summary, event.id, marker)
    }

    fn truncate_title<'a>(&self, title: &'a str) -> Cow<'a, str> {
        match self.options.max_title_length {
            Some(max) => ellipsis(title, max),
            None => Cow::Borrowed(title),
        }
    }
}

/// Truncates `text` to at most `max` characters, ending with `…` when cut.
pub fn ellipsis(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }
    let kept: String = text.chars().take(max - 1).collect();
    Cow::Owned(format!("{}…", kept.trim_end()))
}
