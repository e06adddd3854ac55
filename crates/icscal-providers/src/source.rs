//! Calendar document acquisition.
//!
//! A [`CalendarSource`] is either a local file or an `http(s)` URL. Fetching
//! returns the raw document text; nothing is parsed here.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::{SourceError, SourceResult};

/// Options for fetching a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Request timeout for remote sources.
    pub timeout: Duration,
    /// User agent sent to remote sources.
    pub user_agent: String,
}

impl FetchOptions {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("icscal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where a calendar document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarSource {
    Local(PathBuf),
    Remote(Url),
}

impl CalendarSource {
    /// Classifies a location string.
    ///
    /// `http://` and `https://` locations are remote; anything else is a
    /// file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty location or an unparseable
    /// URL.
    pub fn parse(location: &str) -> SourceResult<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(SourceError::configuration("empty calendar location"));
        }

        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(location).map_err(|e| {
                SourceError::configuration(format!("invalid URL: {e}"))
                    .with_location(location)
                    .with_source(e)
            })?;
            return Ok(Self::Remote(url));
        }

        Ok(Self::Local(PathBuf::from(location)))
    }

    /// Returns true for `http(s)` sources.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Reads the whole document.
    ///
    /// # Errors
    ///
    /// Missing files and HTTP 404 map to `NotFound`, other read failures to
    /// `Io`, transport failures to `Network` and error statuses to `Server`.
    pub async fn fetch(&self, options: &FetchOptions) -> SourceResult<String> {
        let content = match self {
            Self::Local(path) => read_file(path).await,
            Self::Remote(url) => download(url, options).await,
        }
        .map_err(|e| e.with_location(self.to_string()))?;

        debug!(source = %self, bytes = content.len(), "Fetched calendar document");
        Ok(content)
    }
}

impl fmt::Display for CalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

async fn read_file(path: &Path) -> SourceResult<String> {
    trace!(path = %path.display(), "Reading calendar file");
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            SourceError::not_found(format!("file {} does not exist", path.display()))
        }
        _ => SourceError::io(format!("failed to read {}: {e}", path.display())).with_source(e),
    })
}

#[cfg(feature = "remote")]
async fn download(url: &Url, options: &FetchOptions) -> SourceResult<String> {
    use reqwest::{Client, StatusCode};

    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(&options.user_agent)
        .build()
        .map_err(|e| SourceError::network(format!("failed to create HTTP client: {e}")))?;

    trace!(url = %url, "Sending request");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| SourceError::network(format!("request failed: {e}")).with_source(e))?;

    let status = response.status();
    trace!(status = %status, "Received response");

    match status {
        s if s.is_success() => response
            .text()
            .await
            .map_err(|e| SourceError::network(format!("failed to read response: {e}"))),
        StatusCode::NOT_FOUND => Err(SourceError::not_found("calendar not found (404)")),
        s => Err(SourceError::server(format!("unexpected status {s}"))),
    }
}

#[cfg(not(feature = "remote"))]
async fn download(url: &Url, _options: &FetchOptions) -> SourceResult<String> {
    Err(SourceError::configuration(format!(
        "cannot fetch {url}: built without the `remote` feature"
    )))
}
