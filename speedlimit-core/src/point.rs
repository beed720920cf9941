//! Speed-limit points emitted per way.

use geo::Coord;

/// A geocoded speed-limit sample derived from a way.
///
/// One way yields one point in midpoint mode and many in interpolated mode,
/// so `way_id` is not unique across points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::SpeedLimitPoint;
///
/// let point = SpeedLimitPoint::new(42, Coord { x: 11.5, y: 48.1 }, 50);
/// assert_eq!(point.lat(), 48.1);
/// assert_eq!(point.lon(), 11.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimitPoint {
    /// Identifier of the source way.
    pub way_id: i64,
    /// WGS84 position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Parsed speed limit, in the unit the tag was written in.
    pub speed_limit: i64,
}

impl SpeedLimitPoint {
    /// Construct a point.
    #[must_use]
    pub const fn new(way_id: i64, location: Coord<f64>, speed_limit: i64) -> Self {
        Self {
            way_id,
            location,
            speed_limit,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }
}
