use camino::Utf8PathBuf;

/// What [`ensure_archive`](super::ensure_archive) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A file already existed at the destination; nothing was downloaded.
    AlreadyPresent,
    /// The archive was downloaded.
    Downloaded {
        /// Number of bytes written.
        bytes: u64,
    },
}

/// Summary of the fetch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Location of the archive on disk.
    pub path: Utf8PathBuf,
    /// Whether bytes were transferred.
    pub outcome: FetchOutcome,
}

impl FetchReport {
    /// Whether the download was skipped because the file already existed.
    #[must_use]
    pub const fn skipped(&self) -> bool {
        matches!(self.outcome, FetchOutcome::AlreadyPresent)
    }
}
