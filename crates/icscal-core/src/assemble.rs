//! Calendar assembly.
//!
//! Drives the whole pipeline over a [`DecodedDocument`]: every event block is
//! decoded, recurring masters are expanded, the flat list is sorted by start
//! and overrides replace the occurrences they supersede.

use chrono_tz::Tz;
use tracing::{debug, info};

use crate::block::{CalendarHeader, DecodedDocument};
use crate::decode::decode_event;
use crate::error::CalendarResult;
use crate::event::{Calendar, sort_by_start};
use crate::expand::expand;
use crate::resolve::resolve_overrides;
use crate::rrule::RecurrenceRule;
use crate::time::TimestampResolver;

/// Default bound on generated occurrences per recurring event.
pub const DEFAULT_MAX_REPEATS: usize = 10;

/// Options controlling assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Upper bound on occurrences generated per master; 0 disables expansion.
    pub max_repeats: usize,
    /// Zone used for unknown `TZID`s and a missing `X-WR-TIMEZONE`.
    pub default_timezone: Tz,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            max_repeats: DEFAULT_MAX_REPEATS,
            default_timezone: Tz::UTC,
        }
    }
}

impl AssembleOptions {
    /// Builder method to set the repeat bound.
    #[must_use]
    pub fn with_max_repeats(mut self, max_repeats: usize) -> Self {
        self.max_repeats = max_repeats;
        self
    }

    /// Builder method to set the fallback zone.
    #[must_use]
    pub fn with_default_timezone(mut self, timezone: Tz) -> Self {
        self.default_timezone = timezone;
        self
    }
}

/// Builds a [`Calendar`] from a decoded document.
///
/// `source` is recorded as the calendar URL.
///
/// # Errors
///
/// Fails on the first event block that cannot be decoded; no partial calendar
/// is returned.
pub fn assemble(
    document: &DecodedDocument,
    source: &str,
    options: &AssembleOptions,
) -> CalendarResult<Calendar> {
    let resolver = TimestampResolver::new(options.default_timezone);
    let mut events = Vec::with_capacity(document.events.len());

    for block in &document.events {
        let draft = decode_event(block, &resolver)?;
        let master = draft.event;

        let occurrences = if options.max_repeats > 0 {
            RecurrenceRule::parse(&master.rrule, options.max_repeats, master.start.timezone())
                .map(|rule| expand(&master, &rule, options.max_repeats, &draft.excluded))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        events.push(master);
        events.extend(occurrences);
    }

    sort_by_start(&mut events);
    let decoded = events.len();
    let events = resolve_overrides(events);
    debug!(decoded, resolved = events.len(), "Resolved overrides");

    let mut calendar = header_calendar(&document.header, &resolver);
    calendar.url = source.to_string();
    calendar.events = events;

    info!(
        name = %calendar.name,
        source,
        events = calendar.events.len(),
        "Assembled calendar"
    );
    Ok(calendar)
}

fn header_calendar(header: &CalendarHeader, resolver: &TimestampResolver) -> Calendar {
    let timezone = match header.timezone.trim() {
        "" => resolver.fallback(),
        tzid => resolver.zone(tzid),
    };

    let mut calendar = Calendar::new(timezone);
    calendar.name = header.name.clone();
    calendar.description = header.description.clone();
    calendar.version = header.version.trim().parse().unwrap_or(0.0);
    calendar
}
