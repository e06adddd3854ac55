//! iCalendar field extraction.
//!
//! Splits a raw RFC 5545 document into the top-level [`CalendarHeader`] and
//! one [`EventBlock`] per `VEVENT`, using the `icalendar` content-line
//! parser. Property values are kept verbatim; date and time interpretation
//! happens in `icscal_core`.

use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::{debug, trace};

use icscal_core::{CalendarHeader, DecodedDocument, EventBlock, RawProperty};

use crate::error::{SourceError, SourceResult};

const EVENT: &str = "VEVENT";

/// Maps parsed iCalendar components onto decoder input.
///
/// Stateless; build once and share by reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcsRules;

impl IcsRules {
    pub fn new() -> Self {
        Self
    }

    /// Joins folded lines back into single content lines.
    pub fn unfold(&self, content: &str) -> String {
        unfold(content)
    }

    /// Splits a document into its header and event blocks.
    ///
    /// Components other than `VEVENT` (`VTIMEZONE`, `VTODO`, ...) and
    /// components nested inside an event (`VALARM`) are skipped.
    ///
    /// # Errors
    ///
    /// Fails with [`SourceErrorCode::InvalidCalendar`] when the text is not
    /// a well-formed iCalendar document.
    ///
    /// [`SourceErrorCode::InvalidCalendar`]: crate::SourceErrorCode::InvalidCalendar
    pub fn decode_document(&self, content: &str) -> SourceResult<DecodedDocument> {
        let mut document = DecodedDocument::default();
        if content.trim().is_empty() {
            return Ok(document);
        }

        let unfolded = self.unfold(content);
        let calendar = read_calendar(&unfolded)
            .map_err(|e| SourceError::invalid_calendar(format!("unreadable document: {e}")))?;
        if calendar.properties.is_empty() && calendar.components.is_empty() {
            return Err(SourceError::invalid_calendar("no calendar content"));
        }

        for property in &calendar.properties {
            apply_header(&mut document.header, raw_property(property));
        }

        for component in &calendar.components {
            if !is_event(component) {
                trace!(component = %component.name, "Skipping component");
                continue;
            }
            document.events.push(EventBlock {
                properties: component.properties.iter().map(raw_property).collect(),
            });
        }

        debug!(
            events = document.events.len(),
            name = %document.header.name,
            "Extracted calendar document"
        );
        Ok(document)
    }
}

fn is_event(component: &Component<'_>) -> bool {
    component.name.as_ref().eq_ignore_ascii_case(EVENT)
}

/// Copies a parsed property, upper-casing names and dropping quotes.
fn raw_property(property: &Property<'_>) -> RawProperty {
    RawProperty {
        name: property.name.as_ref().to_ascii_uppercase(),
        params: property
            .params
            .iter()
            .map(|p| {
                let value = p.val.as_ref().map(|v| v.to_string()).unwrap_or_default();
                (
                    p.key.as_ref().to_ascii_uppercase(),
                    value.trim_matches('"').to_string(),
                )
            })
            .collect(),
        value: property.val.as_ref().to_string(),
    }
}

fn apply_header(header: &mut CalendarHeader, property: RawProperty) {
    let slot = match property.name.as_str() {
        "X-WR-CALNAME" => &mut header.name,
        "X-WR-CALDESC" => &mut header.description,
        "VERSION" => &mut header.version,
        "X-WR-TIMEZONE" => &mut header.timezone,
        _ => return,
    };
    if slot.is_empty() {
        *slot = property.value;
    }
}
