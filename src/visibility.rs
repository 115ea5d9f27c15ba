//! Visibility predicates for the face-scanning animation.
//!
//! These are pure; the rendering layer re-evaluates them whenever keyguard or
//! auth state changes.

/// The overlay exists and the user has a face enrolled.
pub fn can_show_animation(has_overlay: bool, face_enrolled: bool) -> bool {
    has_overlay && face_enrolled
}

/// The animation may show and face authentication is actively scanning.
pub fn should_show_animation(can_show: bool, face_scanning_active: bool) -> bool {
    can_show && face_scanning_active
}
