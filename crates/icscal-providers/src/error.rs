//! Error types for calendar acquisition and parsing.
//!
//! This module defines the errors that can occur while reading a calendar
//! document from a file or URL and turning it into a [`Calendar`].
//!
//! [`Calendar`]: icscal_core::Calendar

use std::fmt;

use icscal_core::CalendarError;
use thiserror::Error;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// The file or remote resource does not exist.
    NotFound,
    /// Reading a file or writing the document copy failed.
    Io,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    Network,
    /// The server answered with an error status.
    Server,
    /// The document was read but could not be decoded.
    InvalidCalendar,
    /// The source location or options are invalid.
    Configuration,
}

impl SourceErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Io => "io_error",
            Self::Network => "network_error",
            Self::Server => "server_error",
            Self::InvalidCalendar => "invalid_calendar",
            Self::Configuration => "configuration_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while acquiring or parsing a calendar.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// The path or URL being read, when known.
    location: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::NotFound, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Io, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Server, message)
    }

    pub fn invalid_calendar(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidCalendar, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Configuration, message)
    }

    /// Sets the path or URL this error relates to.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location, if set.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref location) = self.location {
            write!(f, "[{}] ", location)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<CalendarError> for SourceError {
    fn from(err: CalendarError) -> Self {
        Self::invalid_calendar(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
