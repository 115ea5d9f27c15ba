//! Cutout geometry and edge identifiers.
//!
//! A display reports up to four cutout rectangles, one per physical edge, in
//! the coordinate space of its *current* rotation. This module turns those
//! rectangles into edge identifiers and maps them back to the display's
//! natural orientation so they stay stable while the device rotates.

pub mod edge;
pub mod rotation;

pub use edge::{classify, CutoutGeometry, EdgePosition, EdgeSet, Rect};
pub use rotation::{normalize, normalize_set, Rotation};
