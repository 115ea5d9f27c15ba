use super::edge::{EdgePosition, EdgeSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::edge::EdgePosition::{Bottom, Left, Right, Top};

/// Clockwise display rotation from the natural orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Rot0,
        Rotation::Rot90,
        Rotation::Rot180,
        Rotation::Rot270,
    ];

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Rot0),
            90 => Some(Rotation::Rot90),
            180 => Some(Rotation::Rot180),
            270 => Some(Rotation::Rot270),
            _ => None,
        }
    }

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 90,
            Rotation::Rot180 => 180,
            Rotation::Rot270 => 270,
        }
    }

    const fn index(self) -> usize {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 1,
            Rotation::Rot180 => 2,
            Rotation::Rot270 => 3,
        }
    }

    /// The rotation that undoes this one.
    pub const fn inverse(self) -> Self {
        match self {
            Rotation::Rot0 => Rotation::Rot0,
            Rotation::Rot90 => Rotation::Rot270,
            Rotation::Rot180 => Rotation::Rot180,
            Rotation::Rot270 => Rotation::Rot90,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = u16::deserialize(deserializer)?;
        Rotation::from_degrees(degrees).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid rotation: {}, expected 0, 90, 180 or 270",
                degrees
            ))
        })
    }
}

/// Natural-frame edge for each (rotation, observed edge) pair.
///
/// Rows are indexed by rotation, columns by `EdgePosition::index`. Each row is
/// a cyclic permutation of the four edges.
const NORMALIZE_TABLE: [[EdgePosition; 4]; 4] = [
    // Rot0
    [Left, Top, Right, Bottom],
    // Rot90
    [Top, Right, Bottom, Left],
    // Rot180
    [Right, Bottom, Left, Top],
    // Rot270
    [Bottom, Left, Top, Right],
];

/// Maps an edge observed in the current rotated frame to the edge the same
/// physical cutout occupies at [`Rotation::Rot0`].
pub fn normalize(position: EdgePosition, current: Rotation) -> EdgePosition {
    NORMALIZE_TABLE[current.index()][position.index()]
}

/// Normalizes every edge in `edges`, keeping the set's iteration order.
pub fn normalize_set(edges: EdgeSet, current: Rotation) -> Vec<EdgePosition> {
    edges.iter().map(|edge| normalize(edge, current)).collect()
}
