//! Per-way transform from [`WayRecord`] to [`SpeedLimitPoint`]s.
//!
//! Checks run in a fixed order: tag presence, node resolution, empty
//! geometry, speed parsing, then sampling. The first failing check decides
//! the [`SkipReason`]. Interpolated ways are sized before sampling so a long
//! way under a fine step is skipped instead of exhausting memory.

use geo::Coord;

use crate::geometry::{StepDistance, interpolate_polyline, midpoint, segment_sample_count};
use crate::tags::{MAXSPEED_KEY, SpeedParseError, is_candidate, parse_speed_limit};
use crate::variant::SamplingMode;
use crate::{SpeedLimitPoint, WayRecord};

/// Upper bound on the points a single way may yield when interpolated.
pub const MAX_WAY_SAMPLES: usize = 1_000_000;

/// Why a way produced no points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The way lacks the `highway` or the `maxspeed` tag.
    MissingTags,
    /// A referenced node had no usable coordinate.
    UnresolvedNode {
        /// Identifier of the first unresolved node.
        node_id: i64,
    },
    /// The way has no nodes, or too few for the sampling mode.
    EmptyGeometry,
    /// The `maxspeed` value could not be parsed.
    UnparseableSpeed {
        /// The raw tag value.
        value: String,
        /// Why parsing failed.
        error: SpeedParseError,
    },
    /// Interpolation would yield more than [`MAX_WAY_SAMPLES`] points.
    TooManySamples {
        /// Points the way would have yielded, saturating at `usize::MAX`.
        samples: usize,
    },
}

/// Result of transforming one way.
#[derive(Debug, Clone, PartialEq)]
pub enum WayOutcome {
    /// The way yielded at least one point.
    Emitted(Vec<SpeedLimitPoint>),
    /// The way was dropped.
    Skipped(SkipReason),
}

/// Derive speed-limit points from a way.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::{SamplingMode, Tags, WayOutcome, WayRecord, transform_way};
///
/// let tags = Tags::from([
///     ("highway".to_owned(), "primary".to_owned()),
///     ("maxspeed".to_owned(), "60".to_owned()),
/// ]);
/// let way = WayRecord::from_coords(
///     9,
///     [Coord { x: 11.0, y: 48.0 }, Coord { x: 11.1, y: 48.1 }],
///     tags,
/// );
/// match transform_way(&way, SamplingMode::Midpoint) {
///     WayOutcome::Emitted(points) => {
///         assert_eq!(points.len(), 1);
///         assert_eq!(points[0].speed_limit, 60);
///         assert_eq!(points[0].lat(), 48.1);
///     }
///     WayOutcome::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
/// }
/// ```
#[must_use]
pub fn transform_way(way: &WayRecord, mode: SamplingMode) -> WayOutcome {
    match derive_points(way, mode) {
        Ok(points) => WayOutcome::Emitted(points),
        Err(reason) => WayOutcome::Skipped(reason),
    }
}

fn derive_points(way: &WayRecord, mode: SamplingMode) -> Result<Vec<SpeedLimitPoint>, SkipReason> {
    if !is_candidate(&way.tags) {
        return Err(SkipReason::MissingTags);
    }
    let coords = resolved_coords(way)?;
    if coords.is_empty() {
        return Err(SkipReason::EmptyGeometry);
    }
    let raw_speed = way.tag(MAXSPEED_KEY).ok_or(SkipReason::MissingTags)?;
    let speed_limit =
        parse_speed_limit(raw_speed).map_err(|error| SkipReason::UnparseableSpeed {
            value: raw_speed.to_owned(),
            error,
        })?;

    let samples = match mode {
        SamplingMode::Midpoint => midpoint(&coords).into_iter().collect(),
        SamplingMode::Interpolated { step } => {
            let samples = polyline_sample_count(&coords, step);
            if samples > MAX_WAY_SAMPLES {
                return Err(SkipReason::TooManySamples { samples });
            }
            interpolate_polyline(&coords, step)
        }
    };
    if samples.is_empty() {
        return Err(SkipReason::EmptyGeometry);
    }

    Ok(samples
        .into_iter()
        .map(|location| SpeedLimitPoint::new(way.id, location, speed_limit))
        .collect())
}

fn polyline_sample_count(coords: &[Coord<f64>], step: StepDistance) -> usize {
    coords
        .windows(2)
        .map(|pair| match pair {
            [from, to] => segment_sample_count(*from, *to, step),
            _ => 0,
        })
        .fold(0, usize::saturating_add)
}

fn resolved_coords(way: &WayRecord) -> Result<Vec<Coord<f64>>, SkipReason> {
    way.nodes
        .iter()
        .map(|node| {
            node.location
                .filter(|location| is_valid_location(*location))
                .ok_or(SkipReason::UnresolvedNode { node_id: node.id })
        })
        .collect()
}

fn is_valid_location(location: Coord<f64>) -> bool {
    location.x.is_finite()
        && location.y.is_finite()
        && (-180.0..=180.0).contains(&location.x)
        && (-90.0..=90.0).contains(&location.y)
}
