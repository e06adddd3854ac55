//! Calendar sources and document decoding.
//!
//! This crate turns a location (file path or `http(s)` URL) into an
//! [`icscal_core::Calendar`]:
//!
//! - [`CalendarSource`] - Where the document lives and how to fetch it
//! - [`IcsRules`] - Field extraction from raw iCalendar text
//! - [`CalendarParser`] - Fetch, extract and assemble in one pass
//! - [`SourceError`] - Error types for acquisition and parsing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐
//! │  .ics file  │    │  HTTP URL   │
//! └──────┬──────┘    └──────┬──────┘
//!        │                  │
//!        │  CalendarSource  │
//!        └────────┬─────────┘
//!                 │ raw text
//!                 ▼
//!          ┌─────────────┐
//!          │  IcsRules   │
//!          └──────┬──────┘
//!                 │ DecodedDocument
//!                 ▼ assemble()
//!          ┌─────────────┐
//!          │  Calendar   │
//!          └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use icscal_providers::{CalendarSource, ParseOptions, parse_calendar};
//!
//! let source = CalendarSource::parse("https://example.com/team.ics")?;
//! let calendar = parse_calendar(&source, ParseOptions::default(), None).await?;
//! ```

pub mod error;
pub mod ics;
pub mod parse;
pub mod source;

pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use ics::IcsRules;
pub use parse::{CalendarParser, ParseOptions, parse_calendar, parse_calendar_content};
pub use source::{CalendarSource, FetchOptions};
