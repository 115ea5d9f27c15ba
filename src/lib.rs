//! Face-scanning overlay placement for displays with cutouts.
//!
//! Given a display's cutout geometry and current rotation, this crate decides
//! whether a face-scanning overlay should exist, which canonical edges it is
//! anchored to, and whether it should currently be visible.

pub mod config;
pub mod cutout;
pub mod overlay;
pub mod provider;
pub mod snapshot;
pub mod visibility;

pub use cutout::{classify, normalize, CutoutGeometry, EdgePosition, EdgeSet, Rect, Rotation};
pub use overlay::{OverlayDescriptor, HEIGHT_HINT_SCALE};
pub use provider::{FaceScanningProviderFactory, GateReason, OverlayReport, OverlayState};
pub use snapshot::DeviceSnapshot;
