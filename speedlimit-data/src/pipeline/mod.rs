//! End-to-end run: fetch the archive, recreate storage, stream ways, commit.
//!
//! Fetch failures abort before storage is touched. Everything after that
//! happens inside one transaction, so a failure while reading the archive or
//! writing rows leaves the previous tables intact.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use speedlimit_core::{
    IngestSummary, PipelineStage, SamplingMode, StepDistance, Variant, WayOutcome, WayRecord,
    transform_way,
};
use thiserror::Error;

use crate::fetch::{ArchiveSource, FetchError, FetchReport, ensure_archive};
use crate::osm::{OsmReadError, read_candidate_ways};
use crate::store::{LoadSession, SpeedLimitStore, StoreError};


/// Regional extract downloaded when no URL is configured.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://download.geofabrik.de/europe/germany/bayern-latest.osm.pbf";
/// Local archive path used when none is configured.
pub const DEFAULT_ARCHIVE_PATH: &str = "./files/bavaria-latest.osm.pbf";
/// Database path used when none is configured.
pub const DEFAULT_DATABASE_PATH: &str = "./files/speed_limits.sqlite";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Where to download the archive from.
    pub archive_url: String,
    /// Where the archive lives on disk.
    pub archive_path: Utf8PathBuf,
    /// Destination SQLite database.
    pub database_path: Utf8PathBuf,
    /// Storage layout and sampling combination.
    pub variant: Variant,
    /// Spacing used by interpolated sampling.
    pub step: StepDistance,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_owned(),
            archive_path: Utf8PathBuf::from(DEFAULT_ARCHIVE_PATH),
            database_path: Utf8PathBuf::from(DEFAULT_DATABASE_PATH),
            variant: Variant::default(),
            step: StepDistance::default(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Outcome of the fetch step.
    pub fetch: FetchReport,
    /// Ways present in the archive, candidates or not.
    pub ways_scanned: u64,
    /// Node references the archive could not resolve.
    pub unresolved_refs: usize,
    /// Per-way counts and bounds of the load.
    pub summary: IngestSummary,
    /// Stages visited, in order.
    pub stages: Vec<PipelineStage>,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The archive could not be made available locally.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The archive could not be read.
    #[error(transparent)]
    Read(#[from] OsmReadError),
    /// The database could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
struct StageTracker {
    visited: Vec<PipelineStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            visited: vec![PipelineStage::Init],
        }
    }

    fn current(&self) -> PipelineStage {
        self.visited.last().copied().unwrap_or(PipelineStage::Init)
    }

    fn advance(&mut self, next: PipelineStage) {
        debug_assert!(next > self.current(), "pipeline stages only move forward");
        info!("{} -> {next}", self.current());
        self.visited.push(next);
    }

    fn into_stages(self) -> Vec<PipelineStage> {
        self.visited
    }
}

/// Run the whole pipeline with `source` as the archive transport.
///
/// # Examples
/// ```no_run
/// use speedlimit_data::fetch::HttpArchiveSource;
/// use speedlimit_data::pipeline::{PipelineConfig, run_pipeline};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpArchiveSource::new()?;
/// let report = run_pipeline(&PipelineConfig::default(), &source)?;
/// println!("{} rows", report.summary.inserted);
/// # Ok(())
/// # }
/// ```
pub fn run_pipeline<S: ArchiveSource + ?Sized>(
    config: &PipelineConfig,
    source: &S,
) -> Result<IngestReport, PipelineError> {
    let mut stages = StageTracker::new();
    info!(
        "Running {} extraction into {}",
        config.variant, config.database_path
    );

    stages.advance(PipelineStage::Fetching);
    let fetch = ensure_archive(source, &config.archive_url, &config.archive_path)?;
    stages.advance(PipelineStage::Fetched);

    let mut store = SpeedLimitStore::open(&config.database_path)?;
    let mut session = store.begin(config.variant.storage_layout())?;
    stages.advance(PipelineStage::StorageReady);

    stages.advance(PipelineStage::Streaming);
    let scan = read_candidate_ways(&config.archive_path)?;
    let ways_scanned = scan.ways_scanned;
    let unresolved_refs = scan.unresolved_refs;
    info!(
        "{} of {ways_scanned} ways carry highway and maxspeed tags",
        scan.ways.len()
    );
    let summary = load_ways(
        &mut session,
        config.variant.sampling(config.step),
        scan.into_ways(),
    )?;
    session.commit()?;
    stages.advance(PipelineStage::Committed);

    log_summary(&summary);
    stages.advance(PipelineStage::Done);

    Ok(IngestReport {
        fetch,
        ways_scanned,
        unresolved_refs,
        summary,
        stages: stages.into_stages(),
    })
}

/// Replace the contents of `database_path` with the points derived from
/// `ways`, using `variant`'s layout and sampling.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use geo::Coord;
/// use speedlimit_core::{StepDistance, Tags, Variant, WayRecord};
/// use speedlimit_data::pipeline::ingest_ways;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let path = Utf8PathBuf::from_path_buf(temp.path().join("speed_limits.sqlite"))
///     .map_err(|_| "non utf-8 temp dir")?;
/// let tags = Tags::from([
///     ("highway".to_owned(), "primary".to_owned()),
///     ("maxspeed".to_owned(), "60".to_owned()),
/// ]);
/// let way = WayRecord::from_coords(
///     1,
///     [Coord { x: 11.0, y: 48.0 }, Coord { x: 11.0, y: 48.000108 }],
///     tags,
/// );
///
/// let summary = ingest_ways(&path, Variant::Interpolated, StepDistance::default(), [way])?;
/// assert_eq!(summary.inserted, 3);
/// # Ok(())
/// # }
/// ```
pub fn ingest_ways<I>(
    database_path: &Utf8Path,
    variant: Variant,
    step: StepDistance,
    ways: I,
) -> Result<IngestSummary, PipelineError>
where
    I: IntoIterator<Item = WayRecord>,
{
    let mut store = SpeedLimitStore::open(database_path)?;
    let mut session = store.begin(variant.storage_layout())?;
    let summary = load_ways(&mut session, variant.sampling(step), ways)?;
    session.commit()?;
    log_summary(&summary);
    Ok(summary)
}

/// Transform each way and insert its points into `session`.
///
/// Skipped ways are counted, never fatal. The caller owns the commit.
pub fn load_ways<I>(
    session: &mut LoadSession<'_>,
    mode: SamplingMode,
    ways: I,
) -> Result<IngestSummary, StoreError>
where
    I: IntoIterator<Item = WayRecord>,
{
    let mut summary = IngestSummary::default();
    for way in ways {
        match transform_way(&way, mode) {
            WayOutcome::Emitted(points) => {
                summary.record_emitted_way();
                for point in &points {
                    session.insert(point)?;
                    summary.record_inserted(point);
                }
            }
            WayOutcome::Skipped(reason) => {
                debug!("Skipping way {}: {reason:?}", way.id);
                summary.record_skip(&reason);
            }
        }
    }
    Ok(summary)
}

fn log_summary(summary: &IngestSummary) {
    let skips = &summary.skips;
    info!(
        "Skipped {} ways ({} missing tags, {} unparseable speed, {} empty geometry, {} unresolved nodes, {} too many samples)",
        summary.skipped(),
        skips.missing_tags,
        skips.unparseable_speed,
        skips.empty_geometry,
        skips.unresolved_nodes,
        skips.too_many_samples
    );
    if let Some(bounds) = summary.bounds {
        debug!(
            "Rows span lat {}..{}, lon {}..{}",
            bounds.min().y,
            bounds.max().y,
            bounds.min().x,
            bounds.max().x
        );
    }
    info!("Inserted {} entries.", summary.inserted);
}
