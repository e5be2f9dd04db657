//! Ray query result structures.
//!
//! The suspension system casts a single ray along the configured down
//! direction each physics tick; this module holds the hit data it consumes.

use bevy::prelude::*;

/// Information about a ground-ray hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Body that was hit, if it is an entity the backend can query.
    pub entity: Option<Entity>,
}

impl GroundHit {
    /// Create a hit record.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}
