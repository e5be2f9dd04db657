//! Vector and rotation helpers used by the controller systems.

use bevy::prelude::*;

/// Move `current` toward `target` by at most `max_delta`, without
/// overshooting. Returns `target` when the remaining distance is within
/// `max_delta`; a zero step holds `current` and a negative step backs away.
pub fn move_toward(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Project a vector onto the horizontal plane and normalize it.
/// Returns `Vec3::ZERO` when the projection is degenerate.
pub fn flatten_to_plane(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Yaw-only rotation facing `direction` (bevy forward is -Z).
///
/// The direction is flattened to the horizontal plane first; a degenerate
/// direction yields the identity rotation.
pub fn yaw_toward(direction: Vec3) -> Quat {
    let flat = flatten_to_plane(direction);
    if flat == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_y((-flat.x).atan2(-flat.z))
    }
}

/// Extract the yaw component of a rotation as a pure yaw rotation.
pub fn yaw_of(rotation: Quat) -> Quat {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}
