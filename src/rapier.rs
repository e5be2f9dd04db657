//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::collision::GroundHit;
use crate::config::{CharacterController, ControllerConfig};
use crate::state::ControllerDisabled;

/// Rapier3D physics backend for the character controller.
///
/// This backend uses `bevy_rapier3d` for force application and velocity
/// access. The ground ray is cast by a dedicated Rapier system that
/// receives the Rapier context as a system parameter.
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    type VelocityComponent = Velocity;

    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        // Accumulate on the controller; apply_controller_forces moves the
        // total onto ExternalForce at the end of the tick.
        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.add_force(force);
        }
    }

    fn apply_torque(world: &mut World, entity: Entity, torque: Vec3) {
        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.add_torque(torque);
        }
    }

    fn get_angular_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.angvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn get_rotation(world: &World, entity: Entity) -> Quat {
        world
            .get::<Transform>(entity)
            .map(|t| t.rotation)
            .or_else(|| world.get::<GlobalTransform>(entity).map(|t| t.rotation()))
            .unwrap_or(Quat::IDENTITY)
    }

    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        // Rapier writes mass properties back after its first step, so the
        // component can be absent or zero on early ticks. Fall back to unit
        // mass instead of scaling forces by garbage.
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.mass)
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(1.0)
    }
}

/// Plugin that sets up the Rapier3D-specific systems for the controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::CharacterControllerSet;

        // Phase 1: Preparation - unwind last tick's contribution
        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(CharacterControllerSet::Preparation),
        );

        // Phase 2: Sensors - ground ray
        app.add_systems(
            FixedUpdate,
            cast_ground_ray.in_set(CharacterControllerSet::Sensors),
        );

        // Phase 4: Final application - move accumulated forces onto the body
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(CharacterControllerSet::FinalApplication),
        );
    }
}

/// Cast the ride-height ground ray for each controller.
///
/// The ray starts at the body origin, travels along the configured down
/// direction for at most `max_ray_length`, and ignores the caster's own
/// rigid body and all sensors. Collision groups on the entity are honored
/// so characters probe the same layers they collide with. The result (or
/// the miss) lands in [`CharacterController::ground`] for the suspension
/// system.
fn cast_ground_ray(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<
        (
            Entity,
            &GlobalTransform,
            &ControllerConfig,
            &mut CharacterController,
            Option<&CollisionGroups>,
        ),
        Without<ControllerDisabled>,
    >,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, mut controller, collision_groups) in &mut q_controllers {
        let origin = transform.translation();

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();
        if let Some(groups) = collision_groups {
            filter = filter.groups(*groups);
        }

        controller.ground = context
            .cast_ray_and_get_normal(
                origin,
                config.down_direction,
                config.max_ray_length,
                true,
                filter,
            )
            .map(|(hit_entity, hit)| {
                GroundHit::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
            });
    }
}

/// Unwind the controller's contribution from last tick.
///
/// Runs before any force system. Subtracting exactly what we added last
/// tick restores `ExternalForce` to its external-only state, so forces
/// applied by user code are never clobbered. Deliberately not gated on
/// [`ControllerDisabled`]: a freshly disabled controller still has one
/// tick of force to take back.
pub fn clear_controller_forces(mut q: Query<(&mut ExternalForce, &mut CharacterController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let (last_force, last_torque) = controller.prepare_new_tick();
        ext_force.force -= last_force;
        ext_force.torque -= last_torque;
    }
}

/// Move this tick's accumulated forces onto the rigid body.
///
/// Runs after all force systems. The controller records what it applied
/// so `clear_controller_forces` can subtract it next tick.
pub fn apply_controller_forces(mut q: Query<(&mut ExternalForce, &mut CharacterController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let (force, torque) = controller.finalize_tick();
        ext_force.force += force;
        ext_force.torque += torque;
    }
}

/// Bundle for creating a character with Rapier3D physics.
///
/// Provides the physics components the controller needs on its entity:
/// rigid body, velocity, external force, axis locking, damping, and the
/// mass properties Rapier writes back from the collider. Add a `Collider`
/// and a `Transform` alongside; world gravity stays on, the suspension
/// spring carries the weight.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use floating_character_controller::prelude::*;
/// use floating_character_controller::rapier::Rapier3dCharacterBundle;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         CharacterController::new(),
///         ControllerConfig::player(),
///         MovementIntent::default(),
///         Rapier3dCharacterBundle::new(),
///         Collider::capsule_y(0.5, 0.3),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `velocity`: zero
/// - `external_force`: zero (the controller accumulates into it)
/// - `locked_axes`: empty, so the upright torque can act
/// - `damping`: linear 0.0, angular 0.5
/// - `mass_properties`: written back by Rapier from the collider
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// The rigid body type. Characters want [`RigidBody::Dynamic`].
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity, updated by Rapier each step.
    pub velocity: Velocity,
    /// Force accumulator the controller writes into at the end of a tick.
    pub external_force: ExternalForce,
    /// Which axes are locked. [`LockedAxes::ROTATION_LOCKED`] turns the
    /// upright torque into a no-op and keeps the body rigidly vertical.
    pub locked_axes: LockedAxes,
    /// Damping coefficients. The controller supplies its own damping terms,
    /// so these stay low.
    pub damping: Damping,
    /// Mass properties Rapier computes from the collider. The locomotion
    /// force is scaled by this mass.
    pub mass_properties: ReadMassProperties,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier3dCharacterBundle {
    /// Create a character bundle with rotation enabled.
    ///
    /// Rotation stays unlocked so the upright torque can level the body
    /// after knocks. For a body that must never tip at all, use
    /// [`Rapier3dCharacterBundle::rotation_locked()`].
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            locked_axes: LockedAxes::empty(),
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 0.5,
            },
            // Rapier fills this in from the collider after the first step
            mass_properties: ReadMassProperties::default(),
        }
    }

    /// Create a character bundle with rotation locked.
    ///
    /// The body stays exactly vertical no matter what hits it and the
    /// upright torque has nothing to do. Suspension and locomotion work
    /// unchanged.
    pub fn rotation_locked() -> Self {
        Self {
            locked_axes: LockedAxes::ROTATION_LOCKED,
            ..Self::new()
        }
    }

    /// Set the rigid body type.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set linear and angular damping.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }

    /// Set which axes are locked.
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }
}
