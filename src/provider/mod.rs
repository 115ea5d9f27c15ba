//! Overlay provider factory.
//!
//! Reads every collaborator once per query into a [`ProviderInputs`]
//! snapshot, then derives the gating decision, the overlay list and the
//! visibility predicates from that single snapshot. Nothing is cached between
//! queries.

mod traits;

pub use traits::{
    CutoutFillQuery, DisplayInfo, DisplayInfoProvider, FaceAuthState, FeatureFlags, Point,
    SensorLocationProvider, FACE_SCANNING_ANIM,
};

use crate::cutout::{classify, normalize_set};
use crate::overlay::{self, OverlayDescriptor};
use crate::visibility;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Why overlays are gated off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    NoDisplay,
    NoCutout,
    NoSensorLocation,
    FlagDisabled,
}

impl GateReason {
    pub fn as_str(self) -> &'static str {
        match self {
            GateReason::NoDisplay => "no_display",
            GateReason::NoCutout => "no_cutout",
            GateReason::NoSensorLocation => "no_sensor_location",
            GateReason::FlagDisabled => "flag_disabled",
        }
    }
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Enabled,
    Disabled(GateReason),
}

impl OverlayState {
    pub fn is_enabled(self) -> bool {
        matches!(self, OverlayState::Enabled)
    }

    pub fn reason(self) -> Option<GateReason> {
        match self {
            OverlayState::Enabled => None,
            OverlayState::Disabled(reason) => Some(reason),
        }
    }
}

impl Serialize for OverlayState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if self.is_enabled() { "enabled" } else { "disabled" })
    }
}

/// Face-auth state captured for one query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceAuthContext {
    pub sensor_location_y: Option<f64>,
    pub feature_enabled: bool,
    pub face_enrolled: bool,
    pub face_scanning_active: bool,
}

/// Immutable snapshot of all collaborator inputs for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderInputs {
    pub display: Option<DisplayInfo>,
    pub has_fill_cutout: bool,
    pub auth: FaceAuthContext,
}

impl ProviderInputs {
    pub fn state(&self) -> OverlayState {
        if self.display.is_none() {
            return OverlayState::Disabled(GateReason::NoDisplay);
        }
        if !self.has_fill_cutout {
            return OverlayState::Disabled(GateReason::NoCutout);
        }
        if self.auth.sensor_location_y.is_none() {
            return OverlayState::Disabled(GateReason::NoSensorLocation);
        }
        if !self.auth.feature_enabled {
            return OverlayState::Disabled(GateReason::FlagDisabled);
        }
        OverlayState::Enabled
    }

    pub fn has_overlay(&self) -> bool {
        self.state().is_enabled()
    }

    pub fn overlays(&self) -> Vec<OverlayDescriptor> {
        let Some(display) = self.display.as_ref().filter(|_| self.has_overlay()) else {
            return Vec::new();
        };
        let edges = normalize_set(classify(&display.cutout), display.rotation);
        overlay::build(&edges, self.auth.sensor_location_y)
    }

    pub fn can_show_animation(&self) -> bool {
        visibility::can_show_animation(self.has_overlay(), self.auth.face_enrolled)
    }

    pub fn should_show_animation(&self) -> bool {
        visibility::should_show_animation(
            self.can_show_animation(),
            self.auth.face_scanning_active,
        )
    }

    pub fn report(&self) -> OverlayReport {
        let state = self.state();
        OverlayReport {
            state,
            reason: state.reason(),
            overlays: self.overlays(),
            can_show_animation: self.can_show_animation(),
            should_show_animation: self.should_show_animation(),
        }
    }
}

/// Everything the rendering layer needs from one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayReport {
    pub state: OverlayState,
    pub reason: Option<GateReason>,
    pub overlays: Vec<OverlayDescriptor>,
    pub can_show_animation: bool,
    pub should_show_animation: bool,
}

/// Decides whether face-scanning overlays exist and where they go.
pub struct FaceScanningProviderFactory {
    display: Arc<dyn DisplayInfoProvider>,
    cutout_fill: Arc<dyn CutoutFillQuery>,
    sensor: Arc<dyn SensorLocationProvider>,
    flags: Arc<dyn FeatureFlags>,
    auth: Arc<dyn FaceAuthState>,
}

impl FaceScanningProviderFactory {
    pub fn new(
        display: Arc<dyn DisplayInfoProvider>,
        cutout_fill: Arc<dyn CutoutFillQuery>,
        sensor: Arc<dyn SensorLocationProvider>,
        flags: Arc<dyn FeatureFlags>,
        auth: Arc<dyn FaceAuthState>,
    ) -> Self {
        Self {
            display,
            cutout_fill,
            sensor,
            flags,
            auth,
        }
    }

    /// Builds a factory from one object that provides every device-side input.
    pub fn for_device<D>(device: Arc<D>, flags: Arc<dyn FeatureFlags>) -> Self
    where
        D: DisplayInfoProvider + CutoutFillQuery + SensorLocationProvider + FaceAuthState + 'static,
    {
        Self::new(device.clone(), device.clone(), device.clone(), flags, device)
    }

    /// Reads each collaborator exactly once.
    pub fn snapshot(&self) -> ProviderInputs {
        let display = self.display.display_info();
        if display.is_none() {
            log::warn!("Display is unavailable; treating as no cutout");
        }
        let has_fill_cutout = display
            .as_ref()
            .map(|info| self.cutout_fill.has_fill_cutout(&info.unique_id))
            .unwrap_or(false);
        let inputs = ProviderInputs {
            display,
            has_fill_cutout,
            auth: FaceAuthContext {
                sensor_location_y: self.sensor.face_sensor_location().map(|p| p.y),
                feature_enabled: self.flags.is_enabled(FACE_SCANNING_ANIM),
                face_enrolled: self.auth.is_face_enrolled(),
                face_scanning_active: self.auth.is_face_scanning(),
            },
        };
        log::debug!("Overlay state: {:?}", inputs.state());
        inputs
    }

    pub fn has_overlay(&self) -> bool {
        self.snapshot().has_overlay()
    }

    pub fn list_overlays(&self) -> Vec<OverlayDescriptor> {
        let overlays = self.snapshot().overlays();
        log::debug!("Overlays: {:?}", overlays);
        overlays
    }

    pub fn can_show_animation(&self) -> bool {
        self.snapshot().can_show_animation()
    }

    pub fn should_show_animation(&self) -> bool {
        self.snapshot().should_show_animation()
    }

    pub fn report(&self) -> OverlayReport {
        self.snapshot().report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutout::{CutoutGeometry, EdgePosition, Rect, Rotation};
    use std::cell::{Cell, RefCell};

    struct FakeDevice {
        display: RefCell<Option<DisplayInfo>>,
        fill_cutout: Cell<bool>,
        sensor: Cell<Option<Point>>,
        enrolled: Cell<bool>,
        scanning: Cell<bool>,
        display_reads: Cell<u32>,
    }

    impl FakeDevice {
        fn new(rotation: Rotation, cutout: CutoutGeometry) -> Self {
            Self {
                display: RefCell::new(Some(DisplayInfo {
                    unique_id: "local:0".to_string(),
                    rotation,
                    cutout,
                })),
                fill_cutout: Cell::new(true),
                sensor: Cell::new(Some(Point { x: 540.0, y: 50.0 })),
                enrolled: Cell::new(true),
                scanning: Cell::new(true),
                display_reads: Cell::new(0),
            }
        }

        fn set_rotation(&self, rotation: Rotation) {
            if let Some(info) = self.display.borrow_mut().as_mut() {
                info.rotation = rotation;
            }
        }
    }

    impl DisplayInfoProvider for FakeDevice {
        fn display_info(&self) -> Option<DisplayInfo> {
            self.display_reads.set(self.display_reads.get() + 1);
            self.display.borrow().clone()
        }
    }

    impl CutoutFillQuery for FakeDevice {
        fn has_fill_cutout(&self, unique_id: &str) -> bool {
            unique_id == "local:0" && self.fill_cutout.get()
        }
    }

    impl SensorLocationProvider for FakeDevice {
        fn face_sensor_location(&self) -> Option<Point> {
            self.sensor.get()
        }
    }

    impl FaceAuthState for FakeDevice {
        fn is_face_enrolled(&self) -> bool {
            self.enrolled.get()
        }

        fn is_face_scanning(&self) -> bool {
            self.scanning.get()
        }
    }

    struct Flags(Cell<bool>);

    impl FeatureFlags for Flags {
        fn is_enabled(&self, flag: &str) -> bool {
            flag == FACE_SCANNING_ANIM && self.0.get()
        }
    }

    fn top_cutout() -> CutoutGeometry {
        CutoutGeometry::with_cutout(EdgePosition::Top, Rect::new(500, 0, 580, 80))
    }

    fn factory(device: &Arc<FakeDevice>, flags: &Arc<Flags>) -> FaceScanningProviderFactory {
        FaceScanningProviderFactory::for_device(device.clone(), flags.clone())
    }

    fn setup(rotation: Rotation, cutout: CutoutGeometry) -> (Arc<FakeDevice>, Arc<Flags>) {
        (
            Arc::new(FakeDevice::new(rotation, cutout)),
            Arc::new(Flags(Cell::new(true))),
        )
    }

    #[test]
    fn end_to_end_top_cutout_at_rot90() {
        let (device, flags) = setup(Rotation::Rot90, top_cutout());
        let factory = factory(&device, &flags);

        assert!(factory.has_overlay());
        assert_eq!(
            factory.list_overlays(),
            vec![OverlayDescriptor {
                edge: EdgePosition::Right,
                height_hint: Some(150.0),
            }]
        );
        assert!(factory.can_show_animation());
        assert!(factory.should_show_animation());
    }

    #[test]
    fn canonical_edge_follows_rotation_changes() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        let factory = factory(&device, &flags);
        assert_eq!(factory.list_overlays()[0].edge, EdgePosition::Top);

        device.set_rotation(Rotation::Rot180);
        assert_eq!(factory.list_overlays()[0].edge, EdgePosition::Bottom);
    }

    #[test]
    fn missing_display_means_no_overlay() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        *device.display.borrow_mut() = None;
        let factory = factory(&device, &flags);

        assert!(!factory.has_overlay());
        assert!(factory.list_overlays().is_empty());
        assert_eq!(factory.snapshot().state(), OverlayState::Disabled(GateReason::NoDisplay));
    }

    #[test]
    fn missing_sensor_means_no_overlay() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        device.sensor.set(None);
        let factory = factory(&device, &flags);

        assert!(!factory.has_overlay());
        assert!(factory.list_overlays().is_empty());
        assert_eq!(
            factory.snapshot().state(),
            OverlayState::Disabled(GateReason::NoSensorLocation)
        );
    }

    #[test]
    fn disabled_flag_means_no_overlay() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        flags.0.set(false);
        let factory = factory(&device, &flags);

        assert!(!factory.has_overlay());
        assert_eq!(
            factory.snapshot().state(),
            OverlayState::Disabled(GateReason::FlagDisabled)
        );
        flags.0.set(true);
        assert!(factory.has_overlay());
    }

    #[test]
    fn no_fill_cutout_means_no_overlay() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        device.fill_cutout.set(false);
        let factory = factory(&device, &flags);

        assert!(!factory.has_overlay());
        assert_eq!(factory.snapshot().state(), OverlayState::Disabled(GateReason::NoCutout));
    }

    #[test]
    fn overlay_count_matches_cutout_edges() {
        let bounds = Rect::new(0, 0, 40, 40);
        let geometry = CutoutGeometry {
            left: bounds,
            top: Rect::EMPTY,
            right: bounds,
            bottom: bounds,
        };
        let (device, flags) = setup(Rotation::Rot270, geometry.clone());
        let factory = factory(&device, &flags);

        let overlays = factory.list_overlays();
        assert_eq!(overlays.len(), classify(&geometry).len());
        // Left, Right, Bottom at 270 -> Bottom, Top, Right
        let edges: Vec<_> = overlays.iter().map(|o| o.edge).collect();
        assert_eq!(
            edges,
            vec![EdgePosition::Bottom, EdgePosition::Top, EdgePosition::Right]
        );

        flags.0.set(false);
        assert!(factory.list_overlays().is_empty());
    }

    #[test]
    fn enrollment_gates_can_show() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        device.enrolled.set(false);
        let factory = factory(&device, &flags);

        assert!(factory.has_overlay());
        assert!(!factory.can_show_animation());
        assert!(!factory.should_show_animation());
    }

    #[test]
    fn can_show_false_without_overlay_even_if_enrolled() {
        let (device, flags) = setup(Rotation::Rot0, CutoutGeometry::default());
        device.fill_cutout.set(false);
        let factory = factory(&device, &flags);

        assert!(!factory.can_show_animation());
    }

    #[test]
    fn should_show_requires_active_scanning() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        device.scanning.set(false);
        let factory = factory(&device, &flags);

        assert!(factory.can_show_animation());
        assert!(!factory.should_show_animation());
    }

    #[test]
    fn display_is_read_once_per_query() {
        let (device, flags) = setup(Rotation::Rot90, top_cutout());
        let factory = factory(&device, &flags);

        factory.list_overlays();
        assert_eq!(device.display_reads.get(), 1);
        factory.report();
        assert_eq!(device.display_reads.get(), 2);
    }

    #[test]
    fn report_describes_disabled_state() {
        let (device, flags) = setup(Rotation::Rot0, top_cutout());
        device.sensor.set(None);
        let report = factory(&device, &flags).report();

        assert!(!report.state.is_enabled());
        assert_eq!(report.reason, Some(GateReason::NoSensorLocation));
        assert!(report.overlays.is_empty());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "disabled",
                "reason": "no_sensor_location",
                "overlays": [],
                "can_show_animation": false,
                "should_show_animation": false,
            })
        );
    }

    #[test]
    fn report_json_for_enabled_state() {
        let (device, flags) = setup(Rotation::Rot90, top_cutout());
        let report = factory(&device, &flags).report();

        assert_eq!(report.state, OverlayState::Enabled);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "enabled",
                "reason": null,
                "overlays": [{"edge": "right", "height_hint": 150.0}],
                "can_show_animation": true,
                "should_show_animation": true,
            })
        );
    }
}
