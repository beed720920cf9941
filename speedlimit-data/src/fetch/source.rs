use std::io::{self, Read};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use super::TransportError;

/// User agent sent with archive downloads.
pub const DEFAULT_USER_AGENT: &str = "speedlimit-engine/0.1";

/// An open archive body together with its announced length.
pub struct ArchiveStream {
    /// Value of the `Content-Length` header, when present.
    pub content_length: Option<u64>,
    /// Blocking reader over the response body.
    pub body: Box<dyn Read>,
}

impl std::fmt::Debug for ArchiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Source of archive bytes.
pub trait ArchiveSource {
    /// Issue the request for `url` and return the response body.
    ///
    /// Implementations must fail on non-success statuses.
    fn open(&self, url: &str) -> Result<ArchiveStream, TransportError>;
}

/// Blocking HTTP implementation of [`ArchiveSource`].
#[derive(Debug)]
pub struct HttpArchiveSource {
    client: Client,
    user_agent: String,
}

impl HttpArchiveSource {
    /// Construct an HTTP-backed archive source.
    ///
    /// Only connecting is bounded by a timeout; regional extracts run to
    /// hundreds of megabytes, so the transfer itself is not.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()
            .map_err(|source| TransportError::Client { source })?;
        Ok(Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Override the default user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn open(&self, url: &str) -> Result<ArchiveStream, TransportError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|err| convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url))?;
        Ok(ArchiveStream {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}
