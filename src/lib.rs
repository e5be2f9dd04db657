//! # `floating_character_controller`
//!
//! A 3D floating rigidbody character controller with physics backend abstraction.
//!
//! This crate provides a responsive, tuneable character controller that:
//! - Floats at a configured ride height on a raycast suspension spring
//! - Steers a dynamic rigidbody toward a goal velocity with clamped forces
//! - Keeps the body upright with a spring-damper torque, facing where it moves
//! - Tunes acceleration and force limits by movement alignment through curves
//! - Abstracts the physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! The controller uses a **floating rigidbody** approach where:
//! 1. A dynamic rigidbody handles collisions normally, gravity stays on
//! 2. A downward raycast measures the distance to the ground each tick
//! 3. A spring-damper force holds that distance at the ride height
//! 4. A horizontal force drives the body's velocity toward the input's goal
//! 5. A corrective torque turns and levels the body toward its goal orientation
//!
//! Input is resolved once per frame, before that frame's fixed ticks, so a
//! fixed tick never sees a half-updated direction. All forces run in
//! `FixedUpdate` and are accumulated on the controller, then moved onto the
//! body in one place; forces other systems put on the same body survive.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use floating_character_controller::prelude::*;
//!
//! // Components for a player-controlled character
//! let controller = CharacterController::new();
//! let config = ControllerConfig::player();
//! let intent = MovementIntent::default();
//!
//! // Spawn these together with the backend's physics bundle and a collider
//! ```

use bevy::app::{RunFixedMainLoop, RunFixedMainLoopSystem};
use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod curve;
pub mod intent;
pub mod math;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::collision::GroundHit;
    pub use crate::config::{CharacterController, ControllerConfig, RayMissPolicy};
    pub use crate::curve::DotCurve;
    pub use crate::intent::{MovementIntent, ViewBasis};
    pub use crate::state::{Airborne, ControllerDisabled, Grounded};
    pub use crate::{CharacterControllerPlugin, CharacterControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// Phases of one controller tick, in `FixedUpdate`, chained in order.
///
/// Backend plugins hang their systems on `Preparation`, `Sensors`, and
/// `FinalApplication`; the force systems live in `Locomotion`. Put systems
/// that write [`config::CharacterController`] fields (like AI steering)
/// before `Locomotion` if the same tick should act on them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Bookkeeping that unwinds the previous tick's forces.
    Preparation,
    /// Backend sensor passes; the ground ray runs here.
    Sensors,
    /// Suspension, locomotion, and upright force computation.
    Locomotion,
    /// Accumulated forces move onto the physics body.
    FinalApplication,
}

/// Main plugin for the character controller system.
///
/// Generic over a physics backend `B` which provides the actual physics
/// operations (velocity access, force application, the ground ray).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use floating_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct CharacterControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::CharacterController>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::RayMissPolicy>();
        app.register_type::<curve::DotCurve>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<intent::ViewBasis>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::ControllerDisabled>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Preparation,
                CharacterControllerSet::Sensors,
                CharacterControllerSet::Locomotion,
                CharacterControllerSet::FinalApplication,
            )
                .chain(),
        );

        // Input resolves at frame rate, before the fixed ticks it feeds.
        app.add_systems(
            RunFixedMainLoop,
            systems::resolve_movement_direction
                .in_set(RunFixedMainLoopSystem::BeforeFixedMainLoop),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_suspension_force::<B>,
                systems::apply_locomotion_force::<B>,
                systems::apply_upright_torque::<B>,
                systems::sync_state_markers,
            )
                .chain()
                .in_set(CharacterControllerSet::Locomotion),
        );
    }
}
