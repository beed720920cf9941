//! Archive download, PBF decoding and SQLite loading for the speed-limit
//! pipeline.
//!
//! Responsibilities:
//! - Fetch the regional OSM extract over HTTP when it is not already on disk.
//! - Read candidate ways and their node coordinates from the PBF archive.
//! - Recreate the destination tables and load derived points into SQLite.
//! - Drive one end-to-end run through its lifecycle stages.
//!
//! Boundaries:
//! - Tag filtering, speed parsing and sampling live in `speedlimit-core`.
//! - Everything here is synchronous and single-threaded.
//!
//! Invariants:
//! - A run commits at most once; any failure leaves the previous tables.
//! - No global mutable state.

pub mod fetch;
mod fs;
pub mod osm;
pub mod pipeline;
pub mod store;

pub use fetch::{
    ArchiveSource, FetchError, FetchOutcome, FetchReport, HttpArchiveSource, TransportError,
    ensure_archive,
};
pub use osm::{OsmReadError, OsmWayScan, read_candidate_ways};
pub use pipeline::{
    DEFAULT_ARCHIVE_PATH, DEFAULT_ARCHIVE_URL, DEFAULT_DATABASE_PATH, IngestReport,
    PipelineConfig, PipelineError, ingest_ways, load_ways, run_pipeline,
};
pub use store::{LoadSession, SpeedLimitStore, StoreError};
