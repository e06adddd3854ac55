//! Error types for calendar decoding.

use thiserror::Error;

/// Errors raised while turning decoded blocks into a calendar.
///
/// Only [`CalendarError::MalformedTimestamp`] and
/// [`CalendarError::MissingProperty`] ever reach the caller of the assembler:
/// an unknown timezone is reported by the zone lookup but the
/// [`TimestampResolver`](crate::time::TimestampResolver) always degrades it to
/// its fallback zone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A date/time property value could not be parsed.
    #[error("malformed timestamp in {property}: {value:?}")]
    MalformedTimestamp {
        /// The property the value came from (e.g. `DTSTART`).
        property: String,
        /// The raw value as found in the document.
        value: String,
    },

    /// A `TZID` that is not a known IANA zone.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A required property is absent from an event block.
    #[error("missing required property {0}")]
    MissingProperty(&'static str),
}

impl CalendarError {
    /// Creates a malformed timestamp error.
    pub fn malformed(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A specialized Result type for calendar decoding.
pub type CalendarResult<T> = Result<T, CalendarError>;
