//! Physics backend abstraction.
//!
//! The controller systems never talk to a physics engine directly; they go
//! through this trait. A backend supplies body reads (velocity, rotation,
//! mass), accepts force/torque contributions, and registers its own plugin
//! for the engine-specific work. That plugin must populate
//! [`CharacterController::ground`](crate::config::CharacterController) with
//! the ground-ray result during the sensor phase, and move the accumulated
//! force/torque onto the body during the application phase.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this to drive the controller with a physics engine. The
/// `rapier3d` feature ships [`Rapier3dBackend`](crate::rapier::Rapier3dBackend)
/// as the reference implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity. Entities without a
    /// velocity component read as zero.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity. No-op if the entity has no
    /// velocity component.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Contribute a force for the current tick.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Contribute a torque for the current tick.
    fn apply_torque(world: &mut World, entity: Entity, torque: Vec3);

    /// Get the current angular velocity of an entity.
    fn get_angular_velocity(world: &World, entity: Entity) -> Vec3;

    /// Get the current rotation of an entity.
    fn get_rotation(world: &World, entity: Entity) -> Quat;

    /// Get the fixed timestep delta, in seconds. Always positive.
    fn get_fixed_timestep(world: &World) -> f32;

    /// Get the mass of an entity, used to scale the locomotion force so
    /// config values produce consistent acceleration across body sizes.
    ///
    /// The default reads as `1.0` (no scaling); backends override this with
    /// the body's real mass where available.
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
