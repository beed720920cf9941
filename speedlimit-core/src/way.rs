//! Ways and their node references as read from the archive.

use geo::Coord;

use crate::tags::Tags;

/// A node reference within a way, with its coordinate when it could be
/// resolved from the archive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayNode {
    /// OpenStreetMap node identifier.
    pub id: i64,
    /// Resolved WGS84 position, `None` when the archive did not provide one.
    pub location: Option<Coord<f64>>,
}

impl WayNode {
    /// Construct a node whose coordinate is known.
    #[must_use]
    pub const fn resolved(id: i64, location: Coord<f64>) -> Self {
        Self {
            id,
            location: Some(location),
        }
    }

    /// Construct a node whose coordinate could not be resolved.
    #[must_use]
    pub const fn unresolved(id: i64) -> Self {
        Self { id, location: None }
    }
}

/// An OpenStreetMap way as consumed by the pipeline.
///
/// Ways are read-only inputs: the pipeline derives points from them and never
/// mutates them.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use speedlimit_core::{Tags, WayRecord};
///
/// let tags = Tags::from([
///     ("highway".to_owned(), "primary".to_owned()),
///     ("maxspeed".to_owned(), "60".to_owned()),
/// ]);
/// let way = WayRecord::from_coords(
///     7,
///     [Coord { x: 11.0, y: 48.0 }, Coord { x: 11.001, y: 48.0 }],
///     tags,
/// );
/// assert_eq!(way.nodes.len(), 2);
/// assert_eq!(way.tag("maxspeed"), Some("60"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WayRecord {
    /// OpenStreetMap way identifier.
    pub id: i64,
    /// Ordered node sequence.
    pub nodes: Vec<WayNode>,
    /// Free-form key/value tags.
    pub tags: Tags,
}

impl WayRecord {
    /// Construct a way from its parts.
    #[must_use]
    pub const fn new(id: i64, nodes: Vec<WayNode>, tags: Tags) -> Self {
        Self { id, nodes, tags }
    }

    /// Construct a way whose nodes are all resolved.
    ///
    /// Node identifiers are synthesised from the node's position in the way,
    /// which is sufficient for in-memory fixtures.
    #[must_use]
    pub fn from_coords<I>(id: i64, coords: I, tags: Tags) -> Self
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let nodes = coords
            .into_iter()
            .zip(1_i64..)
            .map(|(location, node_id)| WayNode::resolved(node_id, location))
            .collect();
        Self::new(id, nodes, tags)
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
