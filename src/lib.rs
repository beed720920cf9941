//! Facade crate for the speed-limit extraction pipeline.
//!
//! This crate re-exports the core domain types together with the fetch,
//! archive and storage entry points.

#![forbid(unsafe_code)]

pub use speedlimit_core::{
    IngestSummary, PipelineStage, SamplingMode, SkipCounts, SkipReason, SpeedLimitPoint,
    StepDistance, StorageLayout, Tags, Variant, WayNode, WayOutcome, WayRecord, transform_way,
};

pub use speedlimit_data::{
    ArchiveSource, FetchError, HttpArchiveSource, IngestReport, OsmReadError, PipelineConfig,
    PipelineError, SpeedLimitStore, StoreError, TransportError, ingest_ways, run_pipeline,
};
