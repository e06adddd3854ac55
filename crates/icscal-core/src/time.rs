//! Time handling for calendar events.
//!
//! This module provides the [`Instant`] alias used for every event time, and
//! [`TimestampResolver`], which turns iCalendar date/time values plus an
//! optional `TZID` into timezone-aware instants.
//!
//! Supported value shapes:
//! - `20150830T093000Z`: UTC
//! - `20150830T093000`: wall-clock time in the `TZID` zone, UTC without one
//! - `20150830`: midnight of that date in the `TZID` zone, UTC without one

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{CalendarError, CalendarResult};

/// A timezone-aware point in time.
///
/// Equality compares the underlying instant, so two values in different zones
/// describing the same moment are equal.
pub type Instant = DateTime<Tz>;

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// Resolves raw date/time values into [`Instant`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampResolver {
    fallback: Tz,
}

impl Default for TimestampResolver {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl TimestampResolver {
    /// Creates a resolver that uses `fallback` for unknown `TZID`s.
    pub fn new(fallback: Tz) -> Self {
        Self { fallback }
    }

    /// Returns the zone used when a `TZID` cannot be resolved.
    pub fn fallback(&self) -> Tz {
        self.fallback
    }

    /// Resolves a timezone identifier, falling back on unknown zones.
    pub fn zone(&self, tzid: &str) -> Tz {
        match lookup_zone(tzid) {
            Ok(tz) => tz,
            Err(e) => {
                warn!(error = %e, fallback = %self.fallback, "Using fallback timezone");
                self.fallback
            }
        }
    }

    /// Resolves a raw value of `property` into an instant.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::MalformedTimestamp`] when the value matches none
    /// of the supported shapes.
    pub fn resolve(
        &self,
        property: &str,
        raw: &str,
        tzid: Option<&str>,
    ) -> CalendarResult<Instant> {
        let value = raw.trim();
        let malformed = || CalendarError::malformed(property, raw);

        if let Some(utc) = value.strip_suffix('Z') {
            let naive =
                NaiveDateTime::parse_from_str(utc, DATE_TIME_FORMAT).map_err(|_| malformed())?;
            return Ok(Tz::UTC.from_utc_datetime(&naive));
        }

        let zone = tzid.map_or(Tz::UTC, |id| self.zone(id));

        if is_date_only(value) {
            let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())?;
            return Ok(localize(zone, date.and_time(NaiveTime::MIN)));
        }

        let naive =
            NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| malformed())?;
        Ok(localize(zone, naive))
    }
}

/// Looks up an IANA timezone identifier.
///
/// # Errors
///
/// Returns [`CalendarError::UnknownTimezone`] for identifiers chrono-tz does
/// not know.
pub fn lookup_zone(tzid: &str) -> CalendarResult<Tz> {
    let id = tzid.trim().trim_matches('"');
    id.parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimezone(id.to_string()))
}

/// Places a wall-clock time in `zone`.
///
/// Ambiguous times (DST fold) take the earliest instant. Times inside a DST
/// gap are shifted forward by one hour.
pub fn localize(zone: Tz, naive: NaiveDateTime) -> Instant {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| zone.from_utc_datetime(&naive))
}

/// Returns 23:59:59 on the same local date as `instant`.
pub fn end_of_day(instant: &Instant) -> Instant {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).expect("valid time");
    localize(instant.timezone(), instant.date_naive().and_time(last_second))
}

/// Returns `true` if the local time of `instant` is exactly 00:00:00.
pub fn is_midnight(instant: &Instant) -> bool {
    instant.hour() == 0 && instant.minute() == 0 && instant.second() == 0
}

/// Returns true for a bare `YYYYMMDD` value.
pub fn is_date_only(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}
