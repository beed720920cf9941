//! Conditional download of the OSM archive to local disk.
#![forbid(unsafe_code)]

mod error;
mod ops;
mod source;
mod types;

#[cfg(any(test, doc, feature = "test-support"))]
pub mod test_support;

pub use error::{FetchError, TransportError};
pub use ops::{CHUNK_SIZE, ensure_archive};
pub use source::{ArchiveSource, ArchiveStream, DEFAULT_USER_AGENT, HttpArchiveSource};
pub use types::{FetchOutcome, FetchReport};
