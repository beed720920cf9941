//! Great-circle distance and polyline sampling.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_METERS`]. Interpolation blends latitude and longitude
//! linearly, so points between two nodes do not follow the geodesic and a
//! segment crossing the antimeridian or passing near a pole takes a shortcut
//! through the wrong side of the globe. The approximation is kept so emitted
//! coordinates stay comparable across runs.

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default spacing between interpolated samples, in meters.
pub const DEFAULT_STEP_METERS: f64 = 5.0;

/// Smallest accepted spacing between interpolated samples, in meters.
pub const MIN_STEP_METERS: f64 = 0.01;

/// Spacing between interpolated samples, at least [`MIN_STEP_METERS`].
///
/// # Examples
/// ```
/// use speedlimit_core::StepDistance;
///
/// let step = StepDistance::new(5.0).expect("valid step");
/// assert_eq!(step.meters(), 5.0);
/// assert!(StepDistance::new(0.0).is_err());
/// assert!(StepDistance::new(1.0e-6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDistance(f64);

/// Errors returned by [`StepDistance::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StepDistanceError {
    /// The step was zero, negative, NaN or infinite.
    #[error("step distance must be a finite positive number of meters, got {0}")]
    NotPositive(f64),
    /// The step was positive but finer than [`MIN_STEP_METERS`].
    #[error("step distance must be at least {MIN_STEP_METERS} m, got {0}")]
    BelowMinimum(f64),
}

impl StepDistance {
    /// Validate and construct a step distance in meters.
    ///
    /// # Errors
    /// Returns [`StepDistanceError::NotPositive`] unless `meters` is finite and
    /// greater than zero, and [`StepDistanceError::BelowMinimum`] when it is
    /// smaller than [`MIN_STEP_METERS`].
    pub fn new(meters: f64) -> Result<Self, StepDistanceError> {
        if !(meters.is_finite() && meters > 0.0) {
            return Err(StepDistanceError::NotPositive(meters));
        }
        if meters < MIN_STEP_METERS {
            return Err(StepDistanceError::BelowMinimum(meters));
        }
        Ok(Self(meters))
    }

    /// The step length in meters.
    #[must_use]
    pub const fn meters(self) -> f64 {
        self.0
    }
}

impl Default for StepDistance {
    fn default() -> Self {
        Self(DEFAULT_STEP_METERS)
    }
}

/// Great-circle distance in meters between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::haversine_distance;
///
/// let munich = Coord { x: 11.5755, y: 48.1374 };
/// assert_eq!(haversine_distance(munich, munich), 0.0);
/// ```
#[must_use]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let phi_from = from.y.to_radians();
    let phi_to = to.y.to_radians();
    let delta_phi = (to.y - from.y).to_radians();
    let delta_lambda = (to.x - from.x).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi_from.cos() * phi_to.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push antipodal inputs fractionally past 1.
    let half_chord = half_chord.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_METERS * half_chord.sqrt().atan2((1.0 - half_chord).sqrt())
}

/// The node at index `floor(n / 2)`, or `None` for an empty sequence.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::midpoint;
///
/// let nodes = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
/// assert_eq!(midpoint(&nodes), Some(Coord { x: 1.0, y: 1.0 }));
/// assert_eq!(midpoint(&[]), None);
/// ```
#[must_use]
pub fn midpoint(nodes: &[Coord<f64>]) -> Option<Coord<f64>> {
    nodes.get(nodes.len() / 2).copied()
}

/// Sample the segment `from -> to` every `step` meters, endpoints included.
///
/// Segments shorter than `step` yield exactly their two endpoints. Longer
/// segments of length `d` yield `floor(d / step) + 1` points spaced evenly in
/// latitude/longitude space.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::{StepDistance, interpolate_segment};
///
/// let from = Coord { x: 11.0, y: 48.0 };
/// let to = Coord { x: 11.0, y: 48.0001 }; // roughly 11 m north
/// let points = interpolate_segment(from, to, StepDistance::default());
/// assert_eq!(points.len(), 3);
/// assert_eq!(points.first(), Some(&from));
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "interval counts stay far below 2^52 for steps of at least a centimetre"
)]
pub fn interpolate_segment(from: Coord<f64>, to: Coord<f64>, step: StepDistance) -> Vec<Coord<f64>> {
    let intervals = segment_intervals(from, to, step);
    if intervals == 0 {
        return vec![from, to];
    }

    let denominator = intervals as f64;
    (0..=intervals)
        .map(|index| {
            let fraction = index as f64 / denominator;
            Coord {
                x: from.x + (to.x - from.x) * fraction,
                y: from.y + (to.y - from.y) * fraction,
            }
        })
        .collect()
}

/// Number of points [`interpolate_segment`] yields for `from -> to`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::{StepDistance, segment_sample_count};
///
/// let from = Coord { x: 11.0, y: 48.0 };
/// let to = Coord { x: 11.0, y: 48.0001 };
/// assert_eq!(segment_sample_count(from, to, StepDistance::default()), 3);
/// assert_eq!(segment_sample_count(from, from, StepDistance::default()), 2);
/// ```
#[must_use]
pub fn segment_sample_count(from: Coord<f64>, to: Coord<f64>, step: StepDistance) -> usize {
    match segment_intervals(from, to, step) {
        0 => 2,
        intervals => intervals.saturating_add(1),
    }
}

/// Whole steps that fit into the segment; zero when it is shorter than one.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the floored ratio of two finite non-negative distances saturates in the cast"
)]
fn segment_intervals(from: Coord<f64>, to: Coord<f64>, step: StepDistance) -> usize {
    let distance = haversine_distance(from, to);
    if distance < step.meters() {
        0
    } else {
        (distance / step.meters()).floor() as usize
    }
}

/// Interpolate every consecutive node pair of a polyline.
///
/// Segment samples are concatenated as produced, so a node shared by two
/// segments appears twice. Sequences with fewer than two nodes have no
/// segments and yield nothing.
#[must_use]
pub fn interpolate_polyline(nodes: &[Coord<f64>], step: StepDistance) -> Vec<Coord<f64>> {
    nodes
        .windows(2)
        .flat_map(|pair| match pair {
            [from, to] => interpolate_segment(*from, *to, step),
            _ => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    /// Degrees of latitude spanning `meters` along a meridian.
    fn meridian_degrees(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_METERS).to_degrees()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let delta = (actual - expected).abs();
        assert!(
            delta <= tolerance,
            "expected {expected}, got {actual} (|Δ| = {delta})"
        );
    }

    #[rstest]
    fn haversine_matches_known_distance() {
        // Munich Marienplatz to Nuremberg Hauptmarkt.
        let munich = Coord { x: 11.5755, y: 48.1374 };
        let nuremberg = Coord { x: 11.0775, y: 49.4539 };
        assert_close(haversine_distance(munich, nuremberg), 151_000.0, 1_000.0);
    }

    #[rstest]
    fn haversine_along_meridian_matches_arc_length() {
        let from = Coord { x: 11.0, y: 0.0 };
        let to = Coord { x: 11.0, y: meridian_degrees(12.0) };
        assert_close(haversine_distance(from, to), 12.0, 1.0e-6);
    }

    #[rstest]
    fn haversine_handles_antipodes() {
        let from = Coord { x: 0.0, y: 0.0 };
        let to = Coord { x: 180.0, y: 0.0 };
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert_close(haversine_distance(from, to), half_circumference, 1.0e-3);
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(0))]
    #[case(2, Some(1))]
    #[case(3, Some(1))]
    #[case(4, Some(2))]
    #[case(7, Some(3))]
    fn midpoint_picks_floor_half(#[case] count: u32, #[case] expected: Option<u32>) {
        let nodes: Vec<Coord<f64>> = (0..count)
            .map(|index| Coord {
                x: f64::from(index),
                y: 0.0,
            })
            .collect();
        let expected = expected.map(|index| Coord {
            x: f64::from(index),
            y: 0.0,
        });
        assert_eq!(midpoint(&nodes), expected);
    }

    #[rstest]
    fn short_segment_emits_both_endpoints() {
        let from = Coord { x: 11.0, y: 48.0 };
        let to = Coord {
            x: 11.0,
            y: 48.0 + meridian_degrees(4.0),
        };
        assert_eq!(
            interpolate_segment(from, to, StepDistance::default()),
            vec![from, to]
        );
    }

    #[rstest]
    fn identical_endpoints_emit_two_points() {
        let node = Coord { x: 11.0, y: 48.0 };
        assert_eq!(
            interpolate_segment(node, node, StepDistance::default()),
            vec![node, node]
        );
    }

    #[rstest]
    #[case(12.0, 3)]
    #[case(5.5, 2)]
    #[case(27.3, 6)]
    #[case(100.5, 21)]
    fn segment_count_follows_floor_law(#[case] meters: f64, #[case] expected: usize) {
        let from = Coord { x: 11.0, y: 0.0 };
        let to = Coord {
            x: 11.0,
            y: meridian_degrees(meters),
        };
        let points = interpolate_segment(from, to, StepDistance::default());
        assert_eq!(points.len(), expected);
        assert_eq!(points.first(), Some(&from));
        let last = points.last().expect("segment yields points");
        assert_close(last.y, to.y, 1.0e-12);
        assert_close(last.x, to.x, 1.0e-12);
    }

    #[rstest]
    fn polyline_concatenates_segments() {
        let step = StepDistance::default();
        let nodes = [
            Coord { x: 11.0, y: 0.0 },
            Coord {
                x: 11.0,
                y: meridian_degrees(12.0),
            },
            Coord {
                x: 11.0,
                y: meridian_degrees(14.0),
            },
        ];
        // 3 samples for the 12 m segment, 2 for the 2 m segment.
        assert_eq!(interpolate_polyline(&nodes, step).len(), 5);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn polyline_without_segments_is_empty(#[case] count: usize) {
        let nodes = vec![Coord { x: 11.0, y: 48.0 }; count];
        assert!(interpolate_polyline(&nodes, StepDistance::default()).is_empty());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_steps(#[case] meters: f64) {
        assert!(matches!(
            StepDistance::new(meters),
            Err(StepDistanceError::NotPositive(_))
        ));
    }

    #[rstest]
    #[case(1.0e-300)]
    #[case(1.0e-6)]
    #[case(0.009)]
    fn rejects_steps_finer_than_a_centimetre(#[case] meters: f64) {
        assert_eq!(
            StepDistance::new(meters),
            Err(StepDistanceError::BelowMinimum(meters))
        );
    }

    #[rstest]
    fn accepts_the_minimum_step() {
        let step = StepDistance::new(MIN_STEP_METERS).expect("minimum step is valid");
        assert_eq!(step.meters(), MIN_STEP_METERS);
    }

    #[rstest]
    fn sample_count_matches_interpolation() {
        let step = StepDistance::new(MIN_STEP_METERS).expect("minimum step is valid");
        let from = Coord { x: 11.0, y: 48.0 };
        let to = Coord { x: 11.0, y: 48.001 };
        let points = interpolate_segment(from, to, step);
        assert_eq!(segment_sample_count(from, to, step), points.len());
    }

    #[rstest]
    #[expect(
        clippy::cast_precision_loss,
        reason = "count is compared within a tolerance"
    )]
    fn antipodal_sample_count_fits_in_usize() {
        let step = StepDistance::new(MIN_STEP_METERS).expect("minimum step is valid");
        let from = Coord { x: 0.0, y: 0.0 };
        let to = Coord { x: 180.0, y: 0.0 };
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        let expected = (half_circumference / MIN_STEP_METERS).floor();
        let count = segment_sample_count(from, to, step);
        assert_close(count as f64, expected + 1.0, 2.0);
    }

    fn coordinate() -> impl Strategy<Value = Coord<f64>> {
        (-179.0_f64..179.0, -85.0_f64..85.0).prop_map(|(x, y)| Coord { x, y })
    }

    proptest! {
        #[test]
        fn haversine_is_symmetric(a in coordinate(), b in coordinate()) {
            let forward = haversine_distance(a, b);
            let backward = haversine_distance(b, a);
            prop_assert!((forward - backward).abs() <= 1.0e-6);
        }

        #[test]
        fn haversine_of_identity_is_zero(a in coordinate()) {
            prop_assert_eq!(haversine_distance(a, a), 0.0);
        }

        #[test]
        fn interpolation_is_deterministic(
            a in coordinate(),
            offset in (-0.01_f64..0.01, -0.01_f64..0.01),
            step in 1.0_f64..50.0,
        ) {
            let b = Coord { x: a.x + offset.0, y: a.y + offset.1 };
            let step = StepDistance::new(step).expect("strategy yields positive steps");
            prop_assert_eq!(interpolate_segment(a, b, step), interpolate_segment(a, b, step));
        }

        #[test]
        fn interpolation_count_law(
            a in coordinate(),
            offset in (-0.01_f64..0.01, -0.01_f64..0.01),
            step in 1.0_f64..50.0,
        ) {
            let b = Coord { x: a.x + offset.0, y: a.y + offset.1 };
            let step = StepDistance::new(step).expect("strategy yields positive steps");
            let distance = haversine_distance(a, b);
            let points = interpolate_segment(a, b, step);
            if distance < step.meters() {
                prop_assert_eq!(points.len(), 2);
            } else {
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "test recomputes the floored sample count"
                )]
                let expected = (distance / step.meters()).floor() as usize + 1;
                prop_assert_eq!(points.len(), expected);
            }
            prop_assert_eq!(points.first(), Some(&a));
        }
    }
}
