//! Error types produced by the archive fetcher.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while making sure the archive exists on disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Preparing the destination directory failed.
    #[error("failed to create directory for {path:?}: {source}")]
    CreateDir {
        /// Archive path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The archive could not be retrieved.
    #[error("failed to download archive: {source}")]
    Download {
        /// Transport failure.
        source: TransportError,
    },
    /// The staging file next to the destination could not be created.
    #[error("failed to create staging file in {dir:?}: {source}")]
    Stage {
        /// Directory that should have held the staging file.
        dir: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Writing downloaded bytes to disk failed.
    #[error("failed to write archive for {path:?}: {source}")]
    WriteArchive {
        /// Final archive path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The body length differed from the announced `Content-Length`.
    #[error("downloaded {actual} bytes but the server announced {expected}")]
    SizeMismatch {
        /// Announced length.
        expected: u64,
        /// Bytes actually received.
        actual: u64,
    },
    /// Moving the completed download into place failed.
    #[error("failed to move downloaded archive into {path:?}: {source}")]
    Persist {
        /// Final archive path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request or the body stream failed due to an I/O error.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Builder error reported by `reqwest`.
        source: reqwest::Error,
    },
}
