use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge of the display a cutout sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePosition {
    Left,
    Top,
    Right,
    Bottom,
}

impl EdgePosition {
    /// All edges in canonical iteration order.
    pub const ALL: [EdgePosition; 4] = [
        EdgePosition::Left,
        EdgePosition::Top,
        EdgePosition::Right,
        EdgePosition::Bottom,
    ];

    /// Position of this edge within [`EdgePosition::ALL`].
    pub const fn index(self) -> usize {
        match self {
            EdgePosition::Left => 0,
            EdgePosition::Top => 1,
            EdgePosition::Right => 2,
            EdgePosition::Bottom => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgePosition::Left => "left",
            EdgePosition::Top => "top",
            EdgePosition::Right => "right",
            EdgePosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for EdgePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer rectangle in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rectangle with no area counts as "no cutout".
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

/// Cutout bounds for each physical edge, in the current rotation's frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CutoutGeometry {
    #[serde(default)]
    pub left: Rect,
    #[serde(default)]
    pub top: Rect,
    #[serde(default)]
    pub right: Rect,
    #[serde(default)]
    pub bottom: Rect,
}

impl CutoutGeometry {
    /// Geometry with a single cutout on `edge`.
    pub fn with_cutout(edge: EdgePosition, bounds: Rect) -> Self {
        let mut geometry = Self::default();
        *geometry.rect_mut(edge) = bounds;
        geometry
    }

    pub fn rect(&self, edge: EdgePosition) -> &Rect {
        match edge {
            EdgePosition::Left => &self.left,
            EdgePosition::Top => &self.top,
            EdgePosition::Right => &self.right,
            EdgePosition::Bottom => &self.bottom,
        }
    }

    pub fn rect_mut(&mut self, edge: EdgePosition) -> &mut Rect {
        match edge {
            EdgePosition::Left => &mut self.left,
            EdgePosition::Top => &mut self.top,
            EdgePosition::Right => &mut self.right,
            EdgePosition::Bottom => &mut self.bottom,
        }
    }
}

/// Set of edges. Iteration always follows [`EdgePosition::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const NONE: EdgeSet = EdgeSet(0);
    pub const ALL: EdgeSet = EdgeSet(0b1111);

    const fn bit(edge: EdgePosition) -> u8 {
        1 << edge.index()
    }

    pub fn insert(&mut self, edge: EdgePosition) {
        self.0 |= Self::bit(edge);
    }

    pub fn contains(&self, edge: EdgePosition) -> bool {
        self.0 & Self::bit(edge) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgePosition> + '_ {
        EdgePosition::ALL
            .into_iter()
            .filter(move |edge| self.contains(*edge))
    }
}

impl FromIterator<EdgePosition> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = EdgePosition>>(iter: I) -> Self {
        let mut set = EdgeSet::NONE;
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

/// Returns the edges whose cutout rectangle is non-empty.
pub fn classify(geometry: &CutoutGeometry) -> EdgeSet {
    EdgePosition::ALL
        .into_iter()
        .filter(|edge| !geometry.rect(*edge).is_empty())
        .collect()
}
