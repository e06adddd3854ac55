//! Event decoding.
//!
//! Converts one [`EventBlock`] into a draft [`Event`] plus the instants its
//! `EXDATE` properties exclude from expansion.

use tracing::{debug, warn};

use crate::block::{EventBlock, RawProperty};
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Attendee, Event};
use crate::time::{Instant, TimestampResolver, end_of_day};

/// A decoded event before expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEvent {
    pub event: Event,
    /// Occurrence starts removed by `EXDATE`.
    pub excluded: Vec<Instant>,
}

/// Decodes an event block.
///
/// A missing `DTEND` defaults to 23:59:59 on the start date, in the start's
/// zone. `CREATED` and `LAST-MODIFIED` are informational: unparseable values
/// are dropped.
///
/// # Errors
///
/// Fails when `DTSTART` is missing, or when `DTSTART`, `DTEND`,
/// `RECURRENCE-ID` or an `EXDATE` value cannot be parsed.
pub fn decode_event(block: &EventBlock, resolver: &TimestampResolver) -> CalendarResult<DraftEvent> {
    let start = block
        .first("DTSTART")
        .ok_or(CalendarError::MissingProperty("DTSTART"))
        .and_then(|p| resolve(resolver, p))?;

    let end = match block.first("DTEND") {
        Some(p) => resolve(resolver, p)?,
        None => end_of_day(&start),
    };
    let end = if end < start {
        warn!(uid = block.text("UID"), %start, %end, "DTEND before DTSTART, clamping");
        start
    } else {
        end
    };

    let mut event = Event::new(block.text("UID"), start, end);
    event.summary = block.text("SUMMARY").to_string();
    event.status = block.text("STATUS").to_string();
    event.description = block.text("DESCRIPTION").to_string();
    event.class = block.text("CLASS").to_string();
    event.location = block.text("LOCATION").to_string();
    event.rrule = block.text("RRULE").trim().to_string();
    event.sequence = block.text("SEQUENCE").trim().parse().unwrap_or(0);
    event.created = informational(resolver, block, "CREATED");
    event.modified = informational(resolver, block, "LAST-MODIFIED");
    event.recurrence_marker = block
        .first("RECURRENCE-ID")
        .map(|p| resolve(resolver, p))
        .transpose()?;
    event.attendees = block
        .all("ATTENDEE")
        .map(decode_attendee)
        .filter(|a| !a.is_empty())
        .collect();
    event.organizer = block
        .first("ORGANIZER")
        .map(decode_organizer)
        .unwrap_or_default();

    let excluded = decode_exclusions(block, resolver)?;

    Ok(DraftEvent { event, excluded })
}

fn resolve(resolver: &TimestampResolver, property: &RawProperty) -> CalendarResult<Instant> {
    resolver.resolve(&property.name, &property.value, property.param("TZID"))
}

fn informational(resolver: &TimestampResolver, block: &EventBlock, name: &str) -> Option<Instant> {
    let property = block.first(name)?;
    match resolve(resolver, property) {
        Ok(instant) => Some(instant),
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable timestamp");
            None
        }
    }
}

/// Collects every `EXDATE` value; a property may list several, comma-separated.
fn decode_exclusions(
    block: &EventBlock,
    resolver: &TimestampResolver,
) -> CalendarResult<Vec<Instant>> {
    let mut excluded = Vec::new();
    for property in block.all("EXDATE") {
        let tzid = property.param("TZID");
        for value in property.value.split(',').filter(|v| !v.trim().is_empty()) {
            excluded.push(resolver.resolve(&property.name, value, tzid)?);
        }
    }
    Ok(excluded)
}

fn decode_attendee(property: &RawProperty) -> Attendee {
    Attendee {
        name: param_text(property, "CN"),
        email: mail_address(&property.value),
        status: param_text(property, "PARTSTAT"),
        role: param_text(property, "ROLE"),
        kind: param_text(property, "CUTYPE"),
    }
}

fn decode_organizer(property: &RawProperty) -> Attendee {
    Attendee {
        name: param_text(property, "CN"),
        email: mail_address(&property.value),
        ..Default::default()
    }
}

fn param_text(property: &RawProperty, name: &str) -> String {
    property.param(name).unwrap_or_default().to_string()
}

/// Returns the address of a `mailto:` URI, or "" for any other value.
fn mail_address(value: &str) -> String {
    let value = value.trim();
    match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => value[7..].to_string(),
        _ => String::new(),
    }
}
