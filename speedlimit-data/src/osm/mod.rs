//! Streaming extraction of speed-limited ways from an OSM PBF archive.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use osmpbf::ElementReader;
use speedlimit_core::WayRecord;
use thiserror::Error;

mod collector;

use collector::WayCollector;

/// Candidate ways read from an archive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmWayScan {
    /// Every way seen in the archive, candidate or not.
    pub ways_scanned: u64,
    /// Ways tagged with both `highway` and `maxspeed`, in archive order.
    pub ways: Vec<WayRecord>,
    /// Node references that no node in the archive resolved.
    pub unresolved_refs: usize,
}

impl OsmWayScan {
    /// Consume the scan, yielding the candidate ways.
    #[must_use]
    pub fn into_ways(self) -> Vec<WayRecord> {
        self.ways
    }
}

/// Errors returned when reading an OSM PBF archive.
#[derive(Debug, Error)]
pub enum OsmReadError {
    /// The archive could not be opened.
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        /// Archive path.
        path: Utf8PathBuf,
        /// Error reported by `osmpbf`.
        #[source]
        source: osmpbf::Error,
    },
    /// The archive contents could not be decoded.
    #[error("failed to decode OSM PBF data at {path:?}")]
    Decode {
        /// Archive path.
        path: Utf8PathBuf,
        /// Error reported by `osmpbf`.
        #[source]
        source: osmpbf::Error,
    },
}

/// Read all ways carrying both `highway` and `maxspeed` from `path`.
///
/// Node coordinates come from inline way locations when present, otherwise
/// from a second pass over the archive restricted to the referenced nodes.
/// References that stay unresolved are left as unresolved [`WayNode`]s.
///
/// [`WayNode`]: speedlimit_core::WayNode
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use speedlimit_data::osm::read_candidate_ways;
///
/// # fn main() -> Result<(), speedlimit_data::osm::OsmReadError> {
/// let scan = read_candidate_ways(Utf8Path::new("files/bavaria-latest.osm.pbf"))?;
/// println!("{} of {} ways carry a speed limit", scan.ways.len(), scan.ways_scanned);
/// # Ok(())
/// # }
/// ```
pub fn read_candidate_ways(path: &Utf8Path) -> Result<OsmWayScan, OsmReadError> {
    let mut collector = WayCollector::default();
    open(path)?
        .for_each(|element| collector.process_element(&element))
        .map_err(|source| decode_error(path, source))?;

    if collector.has_pending_nodes() {
        debug!(
            "Resolving {} node references from {path}",
            collector.pending_node_count()
        );
        open(path)?
            .for_each(|element| collector.resolve_element(&element))
            .map_err(|source| decode_error(path, source))?;
        if collector.has_pending_nodes() {
            warn!(
                "{} way node references have no coordinates in {path}",
                collector.pending_node_count()
            );
        }
    }

    Ok(collector.into_scan())
}

fn open(path: &Utf8Path) -> Result<ElementReader<std::io::BufReader<std::fs::File>>, OsmReadError> {
    ElementReader::from_path(path.as_std_path()).map_err(|source| OsmReadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_error(path: &Utf8Path, source: osmpbf::Error) -> OsmReadError {
    OsmReadError::Decode {
        path: path.to_path_buf(),
        source,
    }
}
