//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Fetching or decoding the calendar failed.
    Source(icscal_providers::SourceError),
    /// IO error.
    Io(std::io::Error),
    /// Rendering the output failed.
    Output(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Source(err) => write!(f, "calendar error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Output(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<icscal_providers::SourceError> for ClientError {
    fn from(err: icscal_providers::SourceError) -> Self {
        Self::Source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icscal_providers::SourceError;

    #[test]
    fn display_prefixes() {
        let err = ClientError::Config("bad timezone".to_string());
        assert_eq!(err.to_string(), "configuration error: bad timezone");

        let err: ClientError = SourceError::not_found("missing").with_location("a.ics").into();
        assert_eq!(err.to_string(), "calendar error: [a.ics] not_found: missing");
    }

    #[test]
    fn io_source() {
        use std::error::Error;
        let err: ClientError = std::io::Error::other("disk full").into();
        assert!(err.source().is_some());
    }
}
