//! In-memory [`ArchiveSource`] used by tests and examples.
use std::cell::Cell;
use std::io::Cursor;

use super::{ArchiveSource, ArchiveStream, TransportError};

/// Stub [`ArchiveSource`] serving fixed bytes, or a fixed HTTP failure.
#[derive(Debug, Clone)]
pub struct StubSource {
    archive: Vec<u8>,
    content_length: Option<u64>,
    status: Option<u16>,
    requests: Cell<usize>,
}

impl StubSource {
    /// Serve `archive` with a matching `Content-Length`.
    #[must_use]
    pub fn new(archive: Vec<u8>) -> Self {
        let length = u64::try_from(archive.len()).ok();
        Self {
            archive,
            content_length: length,
            status: None,
            requests: Cell::new(0),
        }
    }

    /// Serve `archive` without announcing its length.
    #[must_use]
    pub fn without_length(archive: Vec<u8>) -> Self {
        Self {
            content_length: None,
            ..Self::new(archive)
        }
    }

    /// Serve `archive` while announcing `announced` bytes.
    #[must_use]
    pub fn with_announced_length(archive: Vec<u8>, announced: u64) -> Self {
        Self {
            content_length: Some(announced),
            ..Self::new(archive)
        }
    }

    /// Reject every request with the given HTTP status.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new(Vec::new())
        }
    }

    /// Number of requests issued so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl ArchiveSource for StubSource {
    fn open(&self, url: &str) -> Result<ArchiveStream, TransportError> {
        self.requests.set(self.requests.get() + 1);
        if let Some(status) = self.status {
            return Err(TransportError::Http {
                url: url.to_owned(),
                status,
                message: format!("stub rejected request with status {status}"),
            });
        }
        Ok(ArchiveStream {
            content_length: self.content_length,
            body: Box::new(Cursor::new(self.archive.clone())),
        })
    }
}
