//! State marker components.
//!
//! Grounded/Airborne are maintained by the controller systems from the
//! ground-ray result. ControllerDisabled is user-managed and gates the
//! whole controller for an entity.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Added automatically when the ground ray hits within the ride height
/// plus the configured tolerance. Removed when the character becomes
/// airborne. Mutually exclusive with [`Airborne`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use floating_character_controller::prelude::*;
///
/// fn can_act(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Added automatically when the character leaves ground contact.
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component that suspends the controller for an entity.
///
/// While present, input stops being consumed, the ground ray stops, and no
/// new forces are produced. The force bookkeeping still runs one final tick
/// so the controller's contribution unwinds to zero instead of sticking on
/// the body. Removing the marker resumes everything symmetrically; insert
/// and remove it as the on/off switch, there is no separate enable call.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ControllerDisabled;
