//! Run summary with per-reason skip counts and bounds.

use geo::{Coord, Rect};

use crate::SpeedLimitPoint;
use crate::transform::SkipReason;

/// Per-reason counts of skipped ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipCounts {
    /// Ways lacking `highway` or `maxspeed`.
    pub missing_tags: u64,
    /// Ways referencing a node without a usable coordinate.
    pub unresolved_nodes: u64,
    /// Ways without enough nodes to sample.
    pub empty_geometry: u64,
    /// Ways whose `maxspeed` value did not parse.
    pub unparseable_speed: u64,
    /// Ways that would have yielded too many interpolated points.
    pub too_many_samples: u64,
}

impl SkipCounts {
    fn record(&mut self, reason: &SkipReason) {
        let counter = match reason {
            SkipReason::MissingTags => &mut self.missing_tags,
            SkipReason::UnresolvedNode { .. } => &mut self.unresolved_nodes,
            SkipReason::EmptyGeometry => &mut self.empty_geometry,
            SkipReason::UnparseableSpeed { .. } => &mut self.unparseable_speed,
            SkipReason::TooManySamples { .. } => &mut self.too_many_samples,
        };
        *counter += 1;
    }

    /// Total number of skipped ways.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.missing_tags
            + self.unresolved_nodes
            + self.empty_geometry
            + self.unparseable_speed
            + self.too_many_samples
    }
}

/// Outcome of one pipeline run.
///
/// Built up while streaming and returned by value, so callers and tests can
/// inspect how many ways were dropped and why.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::{IngestSummary, SkipReason, SpeedLimitPoint};
///
/// let mut summary = IngestSummary::default();
/// summary.record_skip(&SkipReason::MissingTags);
/// summary.record_emitted_way();
/// summary.record_inserted(&SpeedLimitPoint::new(1, Coord { x: 11.0, y: 48.0 }, 50));
/// assert_eq!(summary.attempted, 2);
/// assert_eq!(summary.skipped(), 1);
/// assert_eq!(summary.inserted, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngestSummary {
    /// Ways handed to the transform.
    pub attempted: u64,
    /// Ways that yielded at least one point.
    pub emitted_ways: u64,
    /// Rows written to the destination table.
    pub inserted: u64,
    /// Skipped ways broken down by reason.
    pub skips: SkipCounts,
    /// Bounding box of the inserted points (`x = longitude`, `y = latitude`).
    pub bounds: Option<Rect<f64>>,
}

impl IngestSummary {
    /// Count a way that was dropped.
    pub fn record_skip(&mut self, reason: &SkipReason) {
        self.attempted += 1;
        self.skips.record(reason);
    }

    /// Count a way that yielded points.
    pub fn record_emitted_way(&mut self) {
        self.attempted += 1;
        self.emitted_ways += 1;
    }

    /// Count an inserted row and widen the bounds to include it.
    pub fn record_inserted(&mut self, point: &SpeedLimitPoint) {
        self.inserted += 1;
        let location = point.location;
        self.bounds = Some(match self.bounds {
            Some(existing) => Rect::new(
                Coord {
                    x: existing.min().x.min(location.x),
                    y: existing.min().y.min(location.y),
                },
                Coord {
                    x: existing.max().x.max(location.x),
                    y: existing.max().y.max(location.y),
                },
            ),
            None => Rect::new(location, location),
        });
    }

    /// Number of ways that produced no rows.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skips.total()
    }
}
