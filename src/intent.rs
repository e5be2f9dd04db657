//! Movement intent and view-basis components.
//!
//! The intent carries the raw 2D input vector from whatever drives the
//! character (keyboard, gamepad, AI, tests). The view basis supplies the
//! camera-relative frame the input is projected through. Both are plain
//! per-entity data so no global input singleton is involved.

use bevy::prelude::*;

use crate::math;

/// Input magnitudes at or below this threshold count as "no input".
pub const INPUT_DEADZONE: f32 = 0.001;

/// Desired movement as a normalized 2D vector.
///
/// `x` is strafe (positive = right), `y` is forward. Writers set it every
/// frame; the direction resolver consumes it before each batch of fixed
/// ticks.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use floating_character_controller::prelude::*;
///
/// let mut intent = MovementIntent::default();
/// intent.set(Vec2::new(0.0, 1.0));
/// assert!(intent.is_active());
///
/// intent.clear();
/// assert!(!intent.is_active());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Current input vector, clamped to unit length.
    pub vector: Vec2,
}

impl MovementIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input vector, clamping its length to 1.
    pub fn set(&mut self, vector: Vec2) {
        self.vector = vector.clamp_length_max(1.0);
    }

    /// Clear the input vector.
    pub fn clear(&mut self) {
        self.vector = Vec2::ZERO;
    }

    /// Whether the input is above the deadzone.
    pub fn is_active(&self) -> bool {
        self.vector.length() > INPUT_DEADZONE
    }
}

/// Camera-relative basis used to project [`MovementIntent`] into world space.
///
/// Holds the horizontal forward and right directions of the active view.
/// The application updates this from its camera; with no camera (tests, AI
/// without a view) the default world-axis basis applies, where intent `y`
/// maps to -Z and intent `x` to +X.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ViewBasis {
    /// Horizontal forward direction (unit length).
    pub forward: Vec3,
    /// Horizontal right direction (unit length).
    pub right: Vec3,
}

impl Default for ViewBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl ViewBasis {
    /// Build a basis from a view transform, flattening its forward and
    /// right vectors to the horizontal plane. Falls back to the default
    /// basis component-wise when a flattened vector degenerates (camera
    /// looking straight down, for example).
    pub fn from_view(transform: &GlobalTransform) -> Self {
        let fallback = Self::default();
        let rotation = transform.rotation();
        let forward = math::flatten_to_plane(rotation * Vec3::NEG_Z);
        let right = math::flatten_to_plane(rotation * Vec3::X);
        Self {
            forward: if forward == Vec3::ZERO {
                fallback.forward
            } else {
                forward
            },
            right: if right == Vec3::ZERO {
                fallback.right
            } else {
                right
            },
        }
    }

    /// Project a 2D input vector into a horizontal world-space direction.
    /// Returns a unit vector, or zero for degenerate input.
    pub fn world_direction(&self, input: Vec2) -> Vec3 {
        math::flatten_to_plane(self.right * input.x + self.forward * input.y)
    }
}
