//! Recorded device state.
//!
//! A [`DeviceSnapshot`] holds every device-side input the provider factory
//! reads, so a device can be described in a TOML file and evaluated offline.

use crate::provider::{
    CutoutFillQuery, DisplayInfo, DisplayInfoProvider, FaceAuthState, Point,
    SensorLocationProvider,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSnapshot {
    #[serde(default)]
    pub enrolled: bool,
    #[serde(default)]
    pub scanning: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceSnapshot {
    /// `None` models a display whose handle is unavailable.
    pub display: Option<DisplayInfo>,
    /// Unique ids of displays whose resources declare a built-in cutout.
    #[serde(default)]
    pub fill_cutout_displays: Vec<String>,
    pub sensor: Option<Point>,
    #[serde(default)]
    pub auth: AuthSnapshot,
}

impl DeviceSnapshot {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }
}

impl DisplayInfoProvider for DeviceSnapshot {
    fn display_info(&self) -> Option<DisplayInfo> {
        self.display.clone()
    }
}

impl CutoutFillQuery for DeviceSnapshot {
    fn has_fill_cutout(&self, unique_id: &str) -> bool {
        self.fill_cutout_displays.iter().any(|id| id == unique_id)
    }
}

impl SensorLocationProvider for DeviceSnapshot {
    fn face_sensor_location(&self) -> Option<Point> {
        self.sensor
    }
}

impl FaceAuthState for DeviceSnapshot {
    fn is_face_enrolled(&self) -> bool {
        self.auth.enrolled
    }

    fn is_face_scanning(&self) -> bool {
        self.auth.scanning
    }
}
