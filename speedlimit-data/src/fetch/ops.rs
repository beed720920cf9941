use std::io::{ErrorKind, Read, Write};

use camino::Utf8Path;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use tempfile::Builder;

use super::source::ArchiveSource;
use super::{FetchError, FetchOutcome, FetchReport, TransportError};
use crate::fs::{ensure_parent_dir, parent_or_current};

/// Size of the buffer used to stream the response body to disk.
pub const CHUNK_SIZE: usize = 8192;

const BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})";
const SPINNER_TEMPLATE: &str = "{msg} {spinner} {bytes} ({bytes_per_sec})";

/// Make sure the archive at `path` exists, downloading it from `url` if not.
///
/// An existing file is trusted as-is. Otherwise the body is streamed into a
/// staging file beside `path` and renamed into place once complete, so an
/// interrupted transfer never leaves a truncated archive behind.
///
/// # Examples
/// ```
/// # use camino::Utf8PathBuf;
/// # use speedlimit_data::fetch::{FetchError, FetchOutcome, ensure_archive};
/// # use speedlimit_data::fetch::test_support::StubSource;
/// # fn example() -> Result<(), FetchError> {
/// let temp = tempfile::tempdir().expect("create temp directory");
/// let path = Utf8PathBuf::from_path_buf(temp.path().join("extract.osm.pbf"))
///     .expect("utf-8 path");
/// let source = StubSource::new(b"pbf bytes".to_vec());
///
/// let report = ensure_archive(&source, "https://example.org/extract.osm.pbf", &path)?;
/// assert_eq!(report.outcome, FetchOutcome::Downloaded { bytes: 9 });
///
/// let again = ensure_archive(&source, "https://example.org/extract.osm.pbf", &path)?;
/// assert!(again.skipped());
/// # Ok(())
/// # }
/// # example().expect("fetch succeeds");
/// ```
pub fn ensure_archive<S: ArchiveSource + ?Sized>(
    source: &S,
    url: &str,
    path: &Utf8Path,
) -> Result<FetchReport, FetchError> {
    if path.exists() {
        info!("{path} already exists, skipping download.");
        return Ok(FetchReport {
            path: path.to_path_buf(),
            outcome: FetchOutcome::AlreadyPresent,
        });
    }

    ensure_parent_dir(path).map_err(|source| FetchError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    let mut stream = source
        .open(url)
        .map_err(|source| FetchError::Download { source })?;

    let dir = parent_or_current(path);
    let mut staging = Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(dir.as_std_path())
        .map_err(|source| FetchError::Stage {
            dir: dir.to_path_buf(),
            source,
        })?;

    info!("Downloading {url} to {path}");
    let progress = progress_bar(stream.content_length);
    let copied = copy_chunks(&mut stream.body, staging.as_file_mut(), &progress, url, path);
    progress.finish_and_clear();
    let bytes = copied?;

    if let Some(expected) = stream.content_length
        && expected != bytes
    {
        return Err(FetchError::SizeMismatch {
            expected,
            actual: bytes,
        });
    }
    staging
        .as_file()
        .sync_all()
        .map_err(|source| FetchError::WriteArchive {
            path: path.to_path_buf(),
            source,
        })?;
    staging
        .persist(path.as_std_path())
        .map_err(|err| FetchError::Persist {
            path: path.to_path_buf(),
            source: err.error,
        })?;

    Ok(FetchReport {
        path: path.to_path_buf(),
        outcome: FetchOutcome::Downloaded { bytes },
    })
}

fn copy_chunks(
    body: &mut dyn Read,
    sink: &mut dyn Write,
    progress: &ProgressBar,
    url: &str,
    path: &Utf8Path,
) -> Result<u64, FetchError> {
    let mut buffer = [0_u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(FetchError::Download {
                    source: TransportError::Network {
                        url: url.to_owned(),
                        source: err,
                    },
                });
            }
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        sink.write_all(chunk)
            .map_err(|source| FetchError::WriteArchive {
                path: path.to_path_buf(),
                source,
            })?;
        let advanced = u64::try_from(read).unwrap_or(u64::MAX);
        total = total.saturating_add(advanced);
        progress.inc(advanced);
    }
    sink.flush().map_err(|source| FetchError::WriteArchive {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(total)
}

fn progress_bar(content_length: Option<u64>) -> ProgressBar {
    let (bar, template) = match content_length {
        Some(length) => (ProgressBar::new(length), BAR_TEMPLATE),
        None => (ProgressBar::new_spinner(), SPINNER_TEMPLATE),
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message("Downloading");
    bar
}
