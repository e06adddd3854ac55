//! Event types for calendar events.
//!
//! This module provides the value types produced by decoding a calendar:
//! - [`Attendee`]: a participant or the organizer of an event
//! - [`Event`]: a master event, a generated occurrence, or an override
//! - [`Calendar`]: header fields plus the final ordered event list

use std::cmp::Ordering;

use chrono::Duration;
use chrono_tz::Tz;
use serde::Serialize;

use crate::time::{Instant, is_midnight};

/// A person attending an event, or its organizer.
///
/// All fields are empty when the document does not provide them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attendee {
    /// Display name (`CN`).
    pub name: String,
    /// Address from the `mailto:` value.
    pub email: String,
    /// Participation status (`PARTSTAT`).
    pub status: String,
    /// Role (`ROLE`).
    pub role: String,
    /// Calendar user type (`CUTYPE`).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Attendee {
    /// Returns true if neither name nor email is known.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// A calendar event.
///
/// The `id` is shared by a master event, every occurrence generated from it
/// and any override for that series. Generated occurrences never carry a
/// rule; overrides carry a `recurrence_marker` equal to the start of the
/// occurrence they replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Series identifier (`UID`).
    pub id: String,
    /// When the event starts.
    pub start: Instant,
    /// When the event ends. Never before `start`.
    pub end: Instant,
    /// Creation time, if present.
    pub created: Option<Instant>,
    /// Last modification time, if present.
    pub modified: Option<Instant>,
    /// Start of the occurrence this override replaces (`RECURRENCE-ID`).
    pub recurrence_marker: Option<Instant>,
    /// `SEQUENCE` for decoded events, occurrence counter for generated ones.
    pub sequence: u32,
    /// Whether start and end both fall on midnight.
    pub whole_day: bool,
    /// Raw recurrence rule, empty when the event does not recur.
    pub rrule: String,
    pub status: String,
    pub description: String,
    pub location: String,
    pub summary: String,
    pub class: String,
    pub attendees: Vec<Attendee>,
    pub organizer: Attendee,
}

impl Event {
    /// Creates an event with the required fields; everything else is empty.
    ///
    /// `whole_day` is inferred from `start` and `end`.
    pub fn new(id: impl Into<String>, start: Instant, end: Instant) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            created: None,
            modified: None,
            recurrence_marker: None,
            sequence: 0,
            whole_day: is_midnight(&start) && is_midnight(&end),
            rrule: String::new(),
            status: String::new(),
            description: String::new(),
            location: String::new(),
            summary: String::new(),
            class: String::new(),
            attendees: Vec::new(),
            organizer: Attendee::default(),
        }
    }

    /// Derives a generated occurrence of this event.
    ///
    /// The occurrence copies every field except `start`, `end` and
    /// `sequence`, and drops the rule.
    pub fn occurrence(&self, start: Instant, end: Instant, sequence: u32) -> Self {
        Self {
            start,
            end,
            sequence,
            rrule: String::new(),
            ..self.clone()
        }
    }

    /// Returns true if this event overrides an occurrence of its series.
    pub fn is_override(&self) -> bool {
        self.recurrence_marker.is_some()
    }

    /// Returns true if this event carries a recurrence rule.
    pub fn is_recurring(&self) -> bool {
        !self.rrule.is_empty()
    }

    /// Returns the event length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = rrule.into();
        self
    }

    /// Builder method to set the recurrence marker.
    pub fn with_recurrence_marker(mut self, marker: Instant) -> Self {
        self.recurrence_marker = Some(marker);
        self
    }
}

/// Orders events ascending by start.
pub fn by_start(a: &Event, b: &Event) -> Ordering {
    a.start.cmp(&b.start)
}

/// Stable-sorts events ascending by start.
pub fn sort_by_start(events: &mut [Event]) {
    events.sort_by(by_start);
}

/// A decoded calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    /// `X-WR-CALNAME`.
    pub name: String,
    /// `X-WR-CALDESC`.
    pub description: String,
    /// Where the document came from (URL or path).
    pub url: String,
    /// `VERSION`, 0.0 when absent or malformed.
    pub version: f64,
    /// `X-WR-TIMEZONE`, or the fallback zone.
    pub timezone: Tz,
    /// Final events, ascending by start.
    pub events: Vec<Event>,
}

impl Calendar {
    /// Creates an empty calendar in the given zone.
    pub fn new(timezone: Tz) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            url: String::new(),
            version: 0.0,
            timezone,
            events: Vec::new(),
        }
    }

    /// Returns the events belonging to one series.
    pub fn series<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.id == id)
    }
}
