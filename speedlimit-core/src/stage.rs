//! Pipeline lifecycle stages.

use std::fmt;

/// Lifecycle stages of one pipeline run, in execution order.
///
/// A run only moves forward. Fetching may abort the run; skips while
/// streaming never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    /// Nothing has happened yet.
    Init,
    /// The archive is being downloaded (or found on disk).
    Fetching,
    /// The archive is available locally.
    Fetched,
    /// Destination tables have been recreated.
    StorageReady,
    /// Ways are being transformed and inserted.
    Streaming,
    /// The single transaction has been committed.
    Committed,
    /// The run finished and all resources were released.
    Done,
}

impl PipelineStage {
    /// Upper-case name used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Fetching => "FETCHING",
            Self::Fetched => "FETCHED",
            Self::StorageReady => "STORAGE_READY",
            Self::Streaming => "STREAMING",
            Self::Committed => "COMMITTED",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
