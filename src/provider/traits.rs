use crate::cutout::{CutoutGeometry, Rotation};
use serde::Deserialize;

/// Feature flag gating the face-scanning animation.
pub const FACE_SCANNING_ANIM: &str = "face_scanning_anim";

/// Current state of a display, read fresh on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplayInfo {
    pub unique_id: String,
    #[serde(default)]
    pub rotation: Rotation,
    /// Cutout bounds in the current rotation's frame.
    #[serde(default)]
    pub cutout: CutoutGeometry,
}

/// Location of the face-auth sensor in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub trait DisplayInfoProvider {
    /// Returns `None` when no display handle is available.
    fn display_info(&self) -> Option<DisplayInfo>;
}

pub trait CutoutFillQuery {
    /// Whether the resource configuration declares a built-in cutout for the
    /// display with this unique id.
    fn has_fill_cutout(&self, unique_id: &str) -> bool;
}

pub trait SensorLocationProvider {
    fn face_sensor_location(&self) -> Option<Point>;
}

pub trait FeatureFlags {
    fn is_enabled(&self, flag: &str) -> bool;
}

/// Keyguard and biometric state.
pub trait FaceAuthState {
    fn is_face_enrolled(&self) -> bool;
    fn is_face_scanning(&self) -> bool;
}
