//! Overlay descriptors handed to the rendering layer.

use crate::cutout::EdgePosition;
use serde::Serialize;

/// Overlay height as a multiple of the face sensor's Y coordinate.
pub const HEIGHT_HINT_SCALE: f64 = 3.0;

/// Placement request for one overlay view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayDescriptor {
    /// Canonical (natural-orientation) edge the overlay is anchored to.
    pub edge: EdgePosition,
    /// Requested height; `None` means use the full-extent default.
    pub height_hint: Option<f64>,
}

impl OverlayDescriptor {
    pub fn new(edge: EdgePosition, sensor_y: Option<f64>) -> Self {
        Self {
            edge,
            height_hint: height_hint(sensor_y),
        }
    }
}

pub fn height_hint(sensor_y: Option<f64>) -> Option<f64> {
    sensor_y.map(|y| y * HEIGHT_HINT_SCALE)
}

/// Builds one descriptor per canonical edge, in the order given.
pub fn build(edges: &[EdgePosition], sensor_y: Option<f64>) -> Vec<OverlayDescriptor> {
    edges
        .iter()
        .map(|edge| OverlayDescriptor::new(*edge, sensor_y))
        .collect()
}
