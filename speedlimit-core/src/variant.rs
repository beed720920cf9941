//! Pipeline variants and the storage and sampling policies they select.

use std::fmt;

use crate::geometry::StepDistance;

/// How a way's polyline is reduced to sample coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingMode {
    /// One sample at node index `floor(n / 2)`.
    Midpoint,
    /// Samples every `step` meters along each segment, endpoints included.
    Interpolated {
        /// Spacing between samples.
        step: StepDistance,
    },
}

/// Table layout and indexing policy for the destination database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLayout {
    /// `id` primary key plus an R*Tree table holding one degenerate box per row.
    SpatialIndex,
    /// `id` primary key plus independent B-tree indexes on `lat` and `lon`.
    ColumnIndexes,
    /// No primary key, so several rows may share a way id, plus the `lat` and
    /// `lon` B-tree indexes.
    ColumnIndexesWithoutKey,
}

impl StorageLayout {
    /// Whether `id` is declared as the table's primary key.
    #[must_use]
    pub const fn has_primary_key(self) -> bool {
        matches!(self, Self::SpatialIndex | Self::ColumnIndexes)
    }

    /// Whether rows are mirrored into the R*Tree index table.
    #[must_use]
    pub const fn uses_spatial_index(self) -> bool {
        matches!(self, Self::SpatialIndex)
    }
}

/// The three supported pipeline configurations.
///
/// # Examples
/// ```
/// use speedlimit_core::{SamplingMode, StepDistance, StorageLayout, Variant};
///
/// let variant = Variant::Interpolated;
/// assert_eq!(variant.storage_layout(), StorageLayout::ColumnIndexesWithoutKey);
/// assert!(matches!(
///     variant.sampling(StepDistance::default()),
///     SamplingMode::Interpolated { .. }
/// ));
/// assert_eq!(variant.to_string(), "interpolated");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Midpoint sampling with an R*Tree spatial index.
    RtreeMidpoint,
    /// Midpoint sampling with latitude and longitude column indexes.
    IndexedMidpoint,
    /// Interpolated sampling with column indexes and repeated way ids.
    #[default]
    Interpolated,
}

impl Variant {
    /// The storage layout used by this variant.
    #[must_use]
    pub const fn storage_layout(self) -> StorageLayout {
        match self {
            Self::RtreeMidpoint => StorageLayout::SpatialIndex,
            Self::IndexedMidpoint => StorageLayout::ColumnIndexes,
            Self::Interpolated => StorageLayout::ColumnIndexesWithoutKey,
        }
    }

    /// The sampling mode used by this variant.
    ///
    /// `step` only applies to [`Variant::Interpolated`].
    #[must_use]
    pub const fn sampling(self, step: StepDistance) -> SamplingMode {
        match self {
            Self::RtreeMidpoint | Self::IndexedMidpoint => SamplingMode::Midpoint,
            Self::Interpolated => SamplingMode::Interpolated { step },
        }
    }

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RtreeMidpoint => "rtree-midpoint",
            Self::IndexedMidpoint => "indexed-midpoint",
            Self::Interpolated => "interpolated",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
