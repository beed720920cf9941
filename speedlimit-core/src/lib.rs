//! Core domain types for the speed-limit extraction pipeline.
//!
//! Responsibilities:
//! - Model OpenStreetMap ways and the speed-limit points derived from them.
//! - Decide way eligibility from tags and parse `maxspeed` values.
//! - Sample a way's polyline into coordinates (midpoint or interpolated).
//!
//! Boundaries:
//! - No I/O. Archive decoding, HTTP and SQLite live in `speedlimit-data`.
//!
//! Invariants:
//! - Coordinates are WGS84 with `x = longitude`, `y = latitude`.
//! - Per-way processing never panics on malformed input; it returns a
//!   [`WayOutcome`] describing why a way was skipped.

#![forbid(unsafe_code)]

pub mod geometry;
mod point;
mod stage;
mod summary;
pub mod tags;
mod transform;
mod variant;
mod way;

pub use geometry::{
    DEFAULT_STEP_METERS, EARTH_RADIUS_METERS, MIN_STEP_METERS, StepDistance, StepDistanceError,
    haversine_distance, interpolate_polyline, interpolate_segment, midpoint, segment_sample_count,
};
pub use point::SpeedLimitPoint;
pub use stage::PipelineStage;
pub use summary::{IngestSummary, SkipCounts};
pub use tags::{SpeedParseError, Tags, is_candidate, parse_speed_limit};
pub use transform::{MAX_WAY_SAMPLES, SkipReason, WayOutcome, transform_way};
pub use variant::{SamplingMode, StorageLayout, Variant};
pub use way::{WayNode, WayRecord};
