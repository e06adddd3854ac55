//! Core types and recurrence engine: time, events, rules, expansion, overrides

pub mod assemble;
pub mod block;
pub mod decode;
pub mod error;
pub mod event;
pub mod expand;
pub mod resolve;
pub mod rrule;
pub mod time;
pub mod tracing;

pub use assemble::{AssembleOptions, DEFAULT_MAX_REPEATS, assemble};
pub use block::{CalendarHeader, DecodedDocument, EventBlock, RawProperty};
pub use decode::{DraftEvent, decode_event};
pub use error::{CalendarError, CalendarResult};
pub use event::{Attendee, Calendar, Event, by_start, sort_by_start};
pub use expand::expand;
pub use resolve::resolve_overrides;
pub use rrule::{Frequency, RecurrenceRule};
pub use time::{Instant, TimestampResolver};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
