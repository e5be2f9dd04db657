//! Controller configuration and state components.
//!
//! [`ControllerConfig`] holds the tuning parameters: locomotion speeds and
//! curves, ride-height spring, and upright correction. [`CharacterController`]
//! is the per-entity state hub the systems read and write each tick.

use bevy::prelude::*;

use crate::collision::GroundHit;
use crate::curve::DotCurve;

/// Policy for the suspension spring when the ground ray misses.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RayMissPolicy {
    /// Drop the suspension force to zero while airborne.
    #[default]
    ZeroOnMiss,
    /// Keep applying the last computed force until the ray hits again.
    HoldLast,
}

/// Tuning parameters for the character controller.
///
/// All values are plain data; mutate them through the builder methods when
/// spawning and leave them alone during play. Speeds are in units/second,
/// forces in units of acceleration times mass (locomotion) or plain force
/// (suspension), angles in radians.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Locomotion ===
    /// Maximum drive speed the goal velocity steers toward.
    pub max_speed: f32,

    /// Acceleration rate of the goal velocity (units/second^2).
    pub acceleration: f32,

    /// Multiplier on `acceleration`, sampled at the alignment dot between
    /// the desired direction and the current goal-velocity direction.
    pub acceleration_curve: DotCurve,

    /// Ceiling on the corrective force magnitude before mass scaling.
    pub max_accel_force: f32,

    /// Multiplier on `max_accel_force`, sampled at the same alignment dot.
    pub max_accel_curve: DotCurve,

    /// Per-axis scale applied to the mass-scaled locomotion force. The
    /// default zeroes the vertical axis so the suspension spring owns it.
    pub force_scale: Vec3,

    // === Suspension ===
    /// Target hover distance from the body origin to the ground along the
    /// down direction. Must exceed the collider's lower extent or the
    /// collider rests on the ground before the spring engages.
    pub ride_height: f32,

    /// Spring stiffness of the ride-height suspension.
    pub spring_strength: f32,

    /// Damping coefficient applied to the closing velocity along the ray.
    pub spring_damper: f32,

    /// Cast direction for the ground ray (unit length).
    pub down_direction: Vec3,

    /// Maximum ground-ray length. Hits beyond this count as a miss and the
    /// `ray_miss_policy` applies.
    pub max_ray_length: f32,

    /// What the suspension does when the ground ray misses.
    pub ray_miss_policy: RayMissPolicy,

    /// Extra distance past `ride_height` still counted as grounded for the
    /// state markers. The spring itself acts on any hit within
    /// `max_ray_length`.
    pub ground_tolerance: f32,

    // === Upright correction ===
    /// Spring strength of the upright correction torque, per radian of
    /// rotation error.
    pub upright_strength: f32,

    /// Damping coefficient applied to the angular velocity.
    pub upright_damper: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Locomotion
            max_speed: 8.0,
            acceleration: 200.0,
            acceleration_curve: DotCurve::default(),
            max_accel_force: 150.0,
            max_accel_curve: DotCurve::default(),
            force_scale: Vec3::new(1.0, 0.0, 1.0),

            // Suspension
            ride_height: 1.0,
            spring_strength: 200.0,
            spring_damper: 20.0,
            down_direction: Vec3::NEG_Y,
            max_ray_length: 3.0,
            ray_miss_policy: RayMissPolicy::default(),
            ground_tolerance: 0.3,

            // Upright correction. Torque is not mass-scaled, so useful
            // values track the body's moment of inertia; these suit a
            // human-sized capsule at unit density.
            upright_strength: 10.0,
            upright_damper: 1.0,
        }
    }
}

impl ControllerConfig {
    /// Config tuned for responsive player control: stiffer suspension and
    /// extra drive authority when reversing direction.
    pub fn player() -> Self {
        Self {
            acceleration: 400.0,
            acceleration_curve: DotCurve::from_points([(-1.0, 2.0), (0.0, 1.2), (1.0, 1.0)]),
            max_accel_force: 300.0,
            max_accel_curve: DotCurve::from_points([(-1.0, 2.0), (0.0, 1.2), (1.0, 1.0)]),
            spring_strength: 400.0,
            spring_damper: 30.0,
            ..default()
        }
    }

    /// Config for AI-driven characters: softer suspension, gentler starts.
    pub fn ai() -> Self {
        Self {
            acceleration: 120.0,
            max_accel_force: 100.0,
            spring_strength: 150.0,
            spring_damper: 15.0,
            ..default()
        }
    }

    /// Builder: set the maximum drive speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Builder: set max speed and acceleration together.
    pub fn with_movement(mut self, max_speed: f32, acceleration: f32) -> Self {
        self.max_speed = max_speed;
        self.acceleration = acceleration;
        self
    }

    /// Builder: set the acceleration curve.
    pub fn with_acceleration_curve(mut self, curve: DotCurve) -> Self {
        self.acceleration_curve = curve;
        self
    }

    /// Builder: set the corrective-force ceiling.
    pub fn with_max_accel_force(mut self, force: f32) -> Self {
        self.max_accel_force = force;
        self
    }

    /// Builder: set the corrective-force curve.
    pub fn with_max_accel_curve(mut self, curve: DotCurve) -> Self {
        self.max_accel_curve = curve;
        self
    }

    /// Builder: set the per-axis force scale.
    pub fn with_force_scale(mut self, scale: Vec3) -> Self {
        self.force_scale = scale;
        self
    }

    /// Builder: set the ride height.
    pub fn with_ride_height(mut self, height: f32) -> Self {
        self.ride_height = height;
        self
    }

    /// Builder: set suspension spring strength and damping.
    pub fn with_spring(mut self, strength: f32, damper: f32) -> Self {
        self.spring_strength = strength;
        self.spring_damper = damper;
        self
    }

    /// Builder: set the ground-ray direction. The vector is normalized;
    /// a degenerate input leaves the direction unchanged.
    pub fn with_down_direction(mut self, direction: Vec3) -> Self {
        let normalized = direction.normalize_or_zero();
        if normalized != Vec3::ZERO {
            self.down_direction = normalized;
        }
        self
    }

    /// Builder: set the maximum ground-ray length.
    pub fn with_ray_length(mut self, length: f32) -> Self {
        self.max_ray_length = length;
        self
    }

    /// Builder: set the ray-miss policy.
    pub fn with_miss_policy(mut self, policy: RayMissPolicy) -> Self {
        self.ray_miss_policy = policy;
        self
    }

    /// Builder: set the grounded tolerance.
    pub fn with_ground_tolerance(mut self, tolerance: f32) -> Self {
        self.ground_tolerance = tolerance;
        self
    }

    /// Builder: set upright torque strength and damping.
    pub fn with_upright(mut self, strength: f32, damper: f32) -> Self {
        self.upright_strength = strength;
        self.upright_damper = damper;
        self
    }
}

/// Per-entity controller state.
///
/// This is the central hub the systems communicate through. The direction
/// resolver writes the desired direction and goal orientation; the sensor
/// pass writes the ground-ray result; the force systems read those, update
/// the derived state, and accumulate the force/torque the backend applies
/// at the end of the tick.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CharacterController {
    /// Latest ground-ray result. None when the ray missed (or no sensor
    /// pass ran yet).
    #[reflect(ignore)]
    pub ground: Option<GroundHit>,

    /// Smoothed goal velocity the locomotion force steers the body toward.
    /// Its magnitude never exceeds the configured max speed.
    pub goal_velocity: Vec3,

    /// Desired horizontal movement direction. Unit length or zero.
    pub desired_direction: Vec3,

    /// Orientation the upright torque drives toward. With active input
    /// this faces the desired direction; with no input it holds the yaw
    /// the body had when input stopped.
    pub goal_orientation: Quat,

    /// Last computed locomotion force, before mass and axis scaling.
    pub locomotion_force: Vec3,

    /// Last computed suspension force magnitude along the ray.
    pub suspension_magnitude: f32,

    /// Direction of the suspension force (unit length).
    pub suspension_direction: Vec3,

    /// Axis of the upright rotation error. Unit length, or zero when the
    /// error angle is negligible.
    pub rotation_axis: Vec3,

    /// Upright rotation error angle in radians, in `[0, pi]`.
    pub rotation_angle: f32,

    // Force bookkeeping. The controller accumulates during the tick and the
    // backend moves accumulated -> applied when writing to the body, so the
    // previous tick's contribution can be subtracted without disturbing
    // forces other systems put on the same body.
    pub(crate) accumulated_force: Vec3,
    pub(crate) accumulated_torque: Vec3,
    pub(crate) applied_force: Vec3,
    pub(crate) applied_torque: Vec3,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            ground: None,
            goal_velocity: Vec3::ZERO,
            desired_direction: Vec3::ZERO,
            goal_orientation: Quat::IDENTITY,
            locomotion_force: Vec3::ZERO,
            suspension_magnitude: 0.0,
            suspension_direction: Vec3::NEG_Y,
            rotation_axis: Vec3::ZERO,
            rotation_angle: 0.0,
            accumulated_force: Vec3::ZERO,
            accumulated_torque: Vec3::ZERO,
            applied_force: Vec3::ZERO,
            applied_torque: Vec3::ZERO,
        }
    }
}

impl CharacterController {
    /// Create a controller with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the ground ray hit within the grounded range.
    pub fn is_grounded(&self, config: &ControllerConfig) -> bool {
        self.ground
            .as_ref()
            .is_some_and(|hit| hit.distance <= config.ride_height + config.ground_tolerance)
    }

    /// Whether the ground ray hit anything at all this tick.
    pub fn ground_detected(&self) -> bool {
        self.ground.is_some()
    }

    /// Distance to the ground, or `f32::MAX` when the ray missed.
    pub fn ground_distance(&self) -> f32 {
        self.ground.as_ref().map(|g| g.distance).unwrap_or(f32::MAX)
    }

    /// Ground surface normal, defaulting to world up on a miss.
    pub fn ground_normal(&self) -> Vec3 {
        self.ground.as_ref().map(|g| g.normal).unwrap_or(Vec3::Y)
    }

    /// Body the ground ray hit, if any.
    pub fn ground_entity(&self) -> Option<Entity> {
        self.ground.as_ref().and_then(|g| g.entity)
    }

    /// Suspension force vector as last computed.
    pub fn suspension_force(&self) -> Vec3 {
        self.suspension_direction * self.suspension_magnitude
    }

    /// Accumulate a force for this tick.
    pub fn add_force(&mut self, force: Vec3) {
        self.accumulated_force += force;
    }

    /// Accumulate a torque for this tick.
    pub fn add_torque(&mut self, torque: Vec3) {
        self.accumulated_torque += torque;
    }

    /// Start a new tick: return the previously applied force/torque so the
    /// backend can subtract it from the body, and reset the accumulators.
    pub(crate) fn prepare_new_tick(&mut self) -> (Vec3, Vec3) {
        let previous = (self.applied_force, self.applied_torque);
        self.applied_force = Vec3::ZERO;
        self.applied_torque = Vec3::ZERO;
        self.accumulated_force = Vec3::ZERO;
        self.accumulated_torque = Vec3::ZERO;
        previous
    }

    /// Finish the tick: record what gets applied and return it for the
    /// backend to add to the body.
    pub(crate) fn finalize_tick(&mut self) -> (Vec3, Vec3) {
        self.applied_force = self.accumulated_force;
        self.applied_torque = self.accumulated_torque;
        (self.applied_force, self.applied_torque)
    }
}
