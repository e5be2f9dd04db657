//! Core controller systems.
//!
//! The direction resolver runs at frame rate and turns raw input into a
//! world-space desired direction and goal orientation. The force systems
//! run each fixed tick, generic over the physics backend: suspension spring
//! first, then the locomotion force, then the upright torque, matching the
//! order the forces depend on each other's state.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::{CharacterController, ControllerConfig, RayMissPolicy};
use crate::intent::{MovementIntent, ViewBasis};
use crate::math;
use crate::state::{Airborne, ControllerDisabled, Grounded};

/// Rotation errors below this angle (radians) collapse to zero torque,
/// since the rotation axis is ill-defined.
const ROTATION_EPSILON: f32 = 1e-6;

/// Resolve the desired movement direction and goal orientation from input.
///
/// Runs once per frame, before the fixed ticks of that frame, so no tick
/// ever observes a half-updated direction. With active input the goal
/// orientation faces the movement direction; with no input the desired
/// direction is zero and the goal orientation holds the body's current
/// yaw, so the upright torque levels the body without turning it.
pub fn resolve_movement_direction(
    mut q_controllers: Query<
        (
            &MovementIntent,
            Option<&ViewBasis>,
            &Transform,
            &mut CharacterController,
        ),
        Without<ControllerDisabled>,
    >,
) {
    for (intent, basis, transform, mut controller) in &mut q_controllers {
        if intent.is_active() {
            let basis = basis.copied().unwrap_or_default();
            let direction = basis.world_direction(intent.vector);
            controller.desired_direction = direction;
            if direction != Vec3::ZERO {
                controller.goal_orientation = math::yaw_toward(direction);
            }
        } else {
            controller.desired_direction = Vec3::ZERO;
            controller.goal_orientation = math::yaw_of(transform.rotation);
        }
    }
}

/// Apply the ride-height suspension spring.
///
/// Reads the ground-ray result the backend's sensor pass stored on the
/// controller and produces a spring-damper force along the configured down
/// direction. The damping term uses the closing velocity relative to the
/// hit body, so riding a moving platform doesn't read as ground rushing
/// away. The force is not mass-scaled.
pub fn apply_suspension_force<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig, CharacterController)> = world
        .query_filtered::<(Entity, &ControllerConfig, &CharacterController), Without<ControllerDisabled>>()
        .iter(world)
        .map(|(e, config, controller)| (e, config.clone(), controller.clone()))
        .collect();

    for (entity, config, state) in entities {
        let down = config.down_direction;

        let (magnitude, direction) = match state.ground {
            Some(hit) => {
                let body_velocity = B::get_velocity(world, entity);
                let other_velocity = hit
                    .entity
                    .map(|other| B::get_velocity(world, other))
                    .unwrap_or(Vec3::ZERO);

                let ray_velocity = down.dot(body_velocity);
                let other_ray_velocity = down.dot(other_velocity);
                let relative_velocity = ray_velocity - other_ray_velocity;

                let distance_error = hit.distance - config.ride_height;
                let magnitude = distance_error * config.spring_strength
                    - relative_velocity * config.spring_damper;
                (magnitude, down)
            }
            None => match config.ray_miss_policy {
                RayMissPolicy::ZeroOnMiss => (0.0, down),
                RayMissPolicy::HoldLast => (state.suspension_magnitude, state.suspension_direction),
            },
        };

        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.suspension_magnitude = magnitude;
            controller.suspension_direction = direction;
        }

        B::apply_force(world, entity, direction * magnitude);
    }
}

/// Apply the locomotion force that steers the body toward the goal velocity.
///
/// The goal velocity moves toward `direction * max_speed` by at most
/// `acceleration * dt` per tick, with the acceleration gated by the
/// alignment curve. The corrective force is the velocity error over one
/// tick, clamped by the (curve-gated) force ceiling, then scaled by body
/// mass and the per-axis force scale.
pub fn apply_locomotion_force<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig, Vec3, Vec3)> = world
        .query_filtered::<(Entity, &ControllerConfig, &CharacterController), Without<ControllerDisabled>>()
        .iter(world)
        .map(|(e, config, controller)| {
            (
                e,
                config.clone(),
                controller.desired_direction,
                controller.goal_velocity,
            )
        })
        .collect();

    // dt > 0 by the fixed-step contract; the backend substitutes the
    // nominal rate when the schedule hasn't produced a delta yet.
    let dt = B::get_fixed_timestep(world);

    for (entity, config, direction, goal_velocity) in entities {
        let current_direction = goal_velocity.normalize_or_zero();
        let alignment = direction.dot(current_direction);

        let accel = config.acceleration * config.acceleration_curve.sample(alignment);
        let target_velocity = direction * config.max_speed;
        let goal_velocity = math::move_toward(goal_velocity, target_velocity, accel * dt);

        let body_velocity = B::get_velocity(world, entity);
        let raw_force = (goal_velocity - body_velocity) / dt;

        let max_accel = config.max_accel_force * config.max_accel_curve.sample(alignment);
        let force = raw_force.clamp_length_max(max_accel);

        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.goal_velocity = goal_velocity;
            controller.locomotion_force = force;
        }

        let mass = B::get_mass(world, entity);
        B::apply_force(world, entity, force * mass * config.force_scale);
    }
}

/// Apply the upright correction torque.
///
/// Computes the shortest-arc rotation from the body's current orientation
/// to the goal orientation, canonicalized so the error angle stays in
/// `[0, pi]`, and drives it with a PD torque: spring on the error angle,
/// damping on the angular velocity. Near-zero errors contribute damping
/// only.
pub fn apply_upright_torque<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig, Quat)> = world
        .query_filtered::<(Entity, &ControllerConfig, &CharacterController), Without<ControllerDisabled>>()
        .iter(world)
        .map(|(e, config, controller)| (e, config.clone(), controller.goal_orientation))
        .collect();

    for (entity, config, goal_orientation) in entities {
        let current = B::get_rotation(world, entity);

        let mut delta = goal_orientation * current.inverse();
        if delta.w < 0.0 {
            delta = -delta;
        }

        let (axis, angle) = delta.to_axis_angle();
        let (axis, angle) = if angle > ROTATION_EPSILON {
            (axis.normalize_or_zero(), angle)
        } else {
            (Vec3::ZERO, 0.0)
        };

        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.rotation_axis = axis;
            controller.rotation_angle = angle;
        }

        let angular_velocity = B::get_angular_velocity(world, entity);
        let torque =
            axis * (angle * config.upright_strength) - angular_velocity * config.upright_damper;
        B::apply_torque(world, entity, torque);
    }
}

/// Sync the Grounded/Airborne markers from the controller's ground state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<
        (
            Entity,
            &CharacterController,
            &ControllerConfig,
            Has<Grounded>,
            Has<Airborne>,
        ),
        Without<ControllerDisabled>,
    >,
) {
    for (entity, controller, config, has_grounded, has_airborne) in &q_controllers {
        let grounded = controller.is_grounded(config);
        if grounded {
            if !has_grounded {
                commands.entity(entity).insert(Grounded).remove::<Airborne>();
            }
        } else if !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}
