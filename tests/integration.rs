//! Integration tests for the character controller.
//!
//! These tests verify the complete system behavior with actual physics simulation.
//! Each test produces PROOF through explicit velocity/force checks.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::*;
use floating_character_controller::prelude::*;
use floating_character_controller::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};

/// Create a minimal test app with physics and character controller.
///
/// Time advances by exactly one fixed timestep per `app.update()`, so every
/// update runs exactly one physics tick regardless of wall-clock speed.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    app.add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default());

    let fixed = Time::<Fixed>::from_hz(60.0);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(fixed.timestep()));
    app.insert_resource(fixed);

    app.finish();
    app.cleanup();

    // The first update only establishes the time baseline (zero delta).
    // Absorb it here so every tick() after this runs one fixed step.
    app.update();
    app
}

/// Spawn a static ground slab and let the physics world pick it up.
///
/// Colliders spawned this frame only reach the physics world in
/// `PostUpdate`, after the fixed-step ray has already run. The absorbed
/// update makes the slab visible to the next tick's ray.
fn spawn_ground(app: &mut App, position: Vec3, half_size: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    let ground = app
        .world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(half_size.x, half_size.y, half_size.z),
        ))
        .id();
    app.update();
    ground
}

/// Spawn a character controller with default config, rotation locked.
fn spawn_character(app: &mut App, position: Vec3) -> Entity {
    spawn_character_with_config(app, position, ControllerConfig::default())
}

/// Spawn a character controller with custom config, rotation locked.
fn spawn_character_with_config(app: &mut App, position: Vec3, config: ControllerConfig) -> Entity {
    let transform = Transform::from_translation(position);
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            CharacterController::new(),
            config,
            MovementIntent::default(),
            Rapier3dCharacterBundle::rotation_locked(),
            Collider::capsule_y(0.5, 0.3),
        ))
        .id()
}

/// Spawn a character free to rotate, tilted by `rotation`.
fn spawn_tilted_character(app: &mut App, position: Vec3, rotation: Quat) -> Entity {
    let transform = Transform::from_translation(position).with_rotation(rotation);
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            CharacterController::new(),
            ControllerConfig::default(),
            MovementIntent::default(),
            Rapier3dCharacterBundle::new(), // Not rotation locked
            Collider::capsule_y(0.5, 0.3),
        ))
        .id()
}

/// Run one physics step.
fn tick(app: &mut App) {
    app.update();
}

/// Run the app for N physics frames.
fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        tick(app);
    }
}

/// Set the movement input on a character.
fn set_intent(app: &mut App, entity: Entity, input: Vec2) {
    if let Some(mut intent) = app.world_mut().get_mut::<MovementIntent>(entity) {
        intent.set(input);
    }
}

// ==================== Ground Ray Tests ====================

mod ground_ray {
    use super::*;

    #[test]
    fn character_above_ground_detects_ground() {
        let mut app = create_test_app();

        // Ground surface at y=0.5 (center at 0, half height 0.5)
        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        // Character center 2 units above the surface, within the 3 unit ray
        let character = spawn_character(&mut app, Vec3::new(0.0, 2.5, 0.0));

        tick(&mut app);

        let controller = app.world().get::<CharacterController>(character).unwrap();

        // PROOF: the ray hit and measured the distance to the surface
        assert!(
            controller.ground_detected(),
            "Ground should be detected by the ray"
        );
        assert!(
            (controller.ground_distance() - 2.0).abs() < 0.1,
            "Ground distance should be ~2.0, got {}",
            controller.ground_distance()
        );

        println!(
            "PROOF: ground_detected={}, ground_distance={}, ground_normal={:?}",
            controller.ground_detected(),
            controller.ground_distance(),
            controller.ground_normal()
        );
    }

    #[test]
    fn character_at_ride_height_is_grounded() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        // Surface at y=0.5, ride_height=1.0: center at y=1.5
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        tick(&mut app);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let config = app.world().get::<ControllerConfig>(character).unwrap();

        println!(
            "PROOF: is_grounded={}, ground_distance={}, grounded_range={}",
            controller.is_grounded(config),
            controller.ground_distance(),
            config.ride_height + config.ground_tolerance
        );

        // PROOF: within ride_height + ground_tolerance counts as grounded
        assert!(
            controller.is_grounded(config),
            "Character at ride height should be grounded"
        );
        assert!(app.world().get::<Grounded>(character).is_some());
        assert!(app.world().get::<Airborne>(character).is_none());
    }

    #[test]
    fn ray_misses_beyond_max_length() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        // Surface at y=0.5, max_ray_length=3.0: center at y=5.0 is out of reach
        let character = spawn_character(&mut app, Vec3::new(0.0, 5.0, 0.0));

        tick(&mut app);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let config = app.world().get::<ControllerConfig>(character).unwrap();

        println!(
            "PROOF: ground_detected={}, is_grounded={}",
            controller.ground_detected(),
            controller.is_grounded(config)
        );

        // PROOF: a hit past max_ray_length is a miss
        assert!(
            !controller.ground_detected(),
            "Ground past max_ray_length should not be detected"
        );
        assert!(app.world().get::<Airborne>(character).is_some());
    }

    #[test]
    fn ray_inherits_collision_groups() {
        let mut app = create_test_app();

        // Ground that only exists on GROUP_1
        let ground_transform = Transform::from_xyz(0.0, 0.0, 0.0);
        app.world_mut().spawn((
            ground_transform,
            GlobalTransform::from(ground_transform),
            RigidBody::Fixed,
            Collider::cuboid(10.0, 0.5, 10.0),
            CollisionGroups::new(Group::GROUP_1, Group::GROUP_1),
        ));
        // Absorb one update so the grouped slab reaches the physics world.
        app.update();

        let spawn_grouped = |app: &mut App, x: f32, groups: CollisionGroups| {
            let transform = Transform::from_xyz(x, 1.5, 0.0);
            app.world_mut()
                .spawn((
                    transform,
                    GlobalTransform::from(transform),
                    CharacterController::new(),
                    ControllerConfig::default(),
                    MovementIntent::default(),
                    Rapier3dCharacterBundle::rotation_locked(),
                    Collider::capsule_y(0.5, 0.3),
                    groups,
                ))
                .id()
        };

        let char_in_group = spawn_grouped(
            &mut app,
            -2.0,
            CollisionGroups::new(Group::GROUP_1, Group::GROUP_1),
        );
        let char_not_in_group = spawn_grouped(
            &mut app,
            2.0,
            CollisionGroups::new(Group::GROUP_2, Group::GROUP_2),
        );

        tick(&mut app);

        let ctrl1 = app
            .world()
            .get::<CharacterController>(char_in_group)
            .unwrap();
        let ctrl2 = app
            .world()
            .get::<CharacterController>(char_not_in_group)
            .unwrap();

        println!(
            "PROOF: GROUP_1 char ground_detected={}, GROUP_2 char ground_detected={}",
            ctrl1.ground_detected(),
            ctrl2.ground_detected()
        );

        // PROOF: the ground ray probes the same layers the body collides with
        assert!(
            ctrl1.ground_detected(),
            "Character in GROUP_1 should detect GROUP_1 ground"
        );
        assert!(
            !ctrl2.ground_detected(),
            "Character in GROUP_2 should NOT detect GROUP_1 ground"
        );
    }

    #[test]
    fn ground_spawned_same_frame_is_seen_next_tick() {
        let mut app = create_test_app();

        // Skip the spawn_ground helper: slab and character go in on the
        // same frame, before the physics world has picked either of them up.
        let transform = Transform::from_translation(Vec3::ZERO);
        app.world_mut().spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(10.0, 0.5, 10.0),
        ));
        let character = spawn_character(&mut app, Vec3::new(0.0, 2.5, 0.0));

        tick(&mut app);
        let seen_first = app
            .world()
            .get::<CharacterController>(character)
            .unwrap()
            .ground_detected();

        tick(&mut app);
        let seen_second = app
            .world()
            .get::<CharacterController>(character)
            .unwrap()
            .ground_detected();

        println!(
            "PROOF: detected after one tick={}, after two ticks={}",
            seen_first, seen_second
        );

        // PROOF: colliders sync into the physics world in PostUpdate, after
        // the fixed-step ray has run, so detection lands on the second tick.
        assert!(
            !seen_first,
            "A slab spawned this frame should not be hit by this frame's ray"
        );
        assert!(
            seen_second,
            "The slab should be visible from the second tick on"
        );
    }
}

// ==================== Suspension Tests ====================

mod suspension {
    use super::*;

    #[test]
    fn character_settles_at_ride_height() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        // Drop in from slightly above the ride height
        let character = spawn_character(&mut app, Vec3::new(0.0, 2.0, 0.0));

        run_frames(&mut app, 300);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let config = app.world().get::<ControllerConfig>(character).unwrap();
        let velocity = app.world().get::<Velocity>(character).unwrap();

        println!(
            "PROOF: ground_distance={}, ride_height={}, velocity.y={}",
            controller.ground_distance(),
            config.ride_height,
            velocity.linvel.y
        );

        // PROOF: the spring holds the body near the ride height. Gravity
        // compresses it slightly: equilibrium sits weight/strength below.
        assert!(
            (controller.ground_distance() - config.ride_height).abs() < 0.1,
            "Should settle near ride height, ground_distance={}",
            controller.ground_distance()
        );
        assert!(
            velocity.linvel.y.abs() < 0.2,
            "Vertical velocity should be damped out, got {}",
            velocity.linvel.y
        );

        // PROOF: the collider bottom (0.8 below center) hangs in the air
        let transform = app.world().get::<Transform>(character).unwrap();
        let capsule_bottom = transform.translation.y - 0.8;
        assert!(
            capsule_bottom > 0.5,
            "Capsule bottom should float above the surface, got y={}",
            capsule_bottom
        );
    }

    #[test]
    fn suspension_tracks_a_sinking_platform() {
        let mut app = create_test_app();

        // Kinematic platform the character rides on
        let platform_transform = Transform::from_xyz(0.0, 0.0, 0.0);
        let platform = app
            .world_mut()
            .spawn((
                platform_transform,
                GlobalTransform::from(platform_transform),
                RigidBody::KinematicVelocityBased,
                Collider::cuboid(5.0, 0.5, 5.0),
                Velocity::linear(Vec3::new(0.0, -0.5, 0.0)),
            ))
            .id();

        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        run_frames(&mut app, 240);

        let platform_y = app.world().get::<Transform>(platform).unwrap().translation.y;
        let controller = app.world().get::<CharacterController>(character).unwrap();
        let config = app.world().get::<ControllerConfig>(character).unwrap();

        println!(
            "PROOF: platform_y={}, ground_distance={}, hit_entity={:?}",
            platform_y,
            controller.ground_distance(),
            controller.ground_entity()
        );

        // PROOF: the platform sank and the character followed it down,
        // still hovering at ride height and still seeing the platform.
        assert!(platform_y < -1.0, "Platform should have sunk");
        assert_eq!(controller.ground_entity(), Some(platform));
        assert!(
            (controller.ground_distance() - config.ride_height).abs() < 0.2,
            "Should keep hovering over the moving platform, ground_distance={}",
            controller.ground_distance()
        );
    }

    #[test]
    fn miss_zeroes_suspension_and_character_falls() {
        let mut app = create_test_app();

        // No ground anywhere
        let character = spawn_character(&mut app, Vec3::new(0.0, 10.0, 0.0));

        run_frames(&mut app, 30);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let velocity = app.world().get::<Velocity>(character).unwrap();

        println!(
            "PROOF: suspension_magnitude={}, velocity.y={}",
            controller.suspension_magnitude, velocity.linvel.y
        );

        // PROOF: with ZeroOnMiss the spring is inert and gravity wins
        assert_eq!(controller.suspension_magnitude, 0.0);
        assert!(
            velocity.linvel.y < -1.0,
            "Character should be in free fall, velocity.y={}",
            velocity.linvel.y
        );
        assert!(app.world().get::<Airborne>(character).is_some());
    }

    #[test]
    fn hold_last_keeps_carrying_the_body_after_a_miss() {
        let mut app = create_test_app();

        let ground = spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        let character = spawn_character_with_config(
            &mut app,
            Vec3::new(0.0, 1.5, 0.0),
            ControllerConfig::default().with_miss_policy(RayMissPolicy::HoldLast),
        );

        // Settle so the stored force exactly carries the weight
        run_frames(&mut app, 300);
        let held = app
            .world()
            .get::<CharacterController>(character)
            .unwrap()
            .suspension_magnitude;
        assert!(held < 0.0, "Settled spring should push up, got {}", held);

        // Pull the ground out from under it
        app.world_mut().despawn(ground);
        run_frames(&mut app, 60);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let velocity = app.world().get::<Velocity>(character).unwrap();

        println!(
            "PROOF: held_magnitude={}, current_magnitude={}, velocity.y={}",
            held, controller.suspension_magnitude, velocity.linvel.y
        );

        // PROOF: the last force keeps being applied and still cancels
        // gravity, so the body hangs instead of falling.
        assert!(!controller.ground_detected());
        assert!((controller.suspension_magnitude - held).abs() < 1e-3);
        assert!(
            velocity.linvel.y.abs() < 0.5,
            "Held suspension should keep carrying the body, velocity.y={}",
            velocity.linvel.y
        );
    }
}

// ==================== Locomotion Tests ====================

mod locomotion {
    use super::*;

    #[test]
    fn movement_intent_drives_velocity() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(50.0, 0.5, 50.0));
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        run_frames(&mut app, 30);
        let vel_before = app.world().get::<Velocity>(character).unwrap().linvel;

        // Forward input maps to -Z with the default view basis
        set_intent(&mut app, character, Vec2::new(0.0, 1.0));
        run_frames(&mut app, 30);

        let vel_after = app.world().get::<Velocity>(character).unwrap().linvel;

        println!(
            "PROOF: vel_before={:?}, vel_after={:?}",
            vel_before, vel_after
        );

        // PROOF: the body accelerated along -Z
        assert!(
            vel_after.z < vel_before.z - 1.0,
            "Forward intent should drive the body along -Z"
        );
    }

    #[test]
    fn velocity_converges_to_max_speed_and_stays_there() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(200.0, 0.5, 200.0));
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        set_intent(&mut app, character, Vec2::new(0.0, 1.0));
        run_frames(&mut app, 180);

        let velocity = app.world().get::<Velocity>(character).unwrap().linvel;
        let config = app.world().get::<ControllerConfig>(character).unwrap();
        let speed = velocity.xz().length();

        println!(
            "PROOF: speed={}, max_speed={}, velocity={:?}",
            speed, config.max_speed, velocity
        );

        // PROOF: the drive saturates at max_speed instead of accelerating forever
        assert!(
            speed > config.max_speed * 0.8,
            "Should reach most of max speed, got {}",
            speed
        );
        assert!(
            speed < config.max_speed * 1.1,
            "Should never exceed max speed, got {}",
            speed
        );
    }

    #[test]
    fn releasing_input_brakes_the_body() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(200.0, 0.5, 200.0));
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        set_intent(&mut app, character, Vec2::new(0.0, 1.0));
        run_frames(&mut app, 120);
        let cruising = app.world().get::<Velocity>(character).unwrap().linvel;

        set_intent(&mut app, character, Vec2::ZERO);
        run_frames(&mut app, 120);
        let stopped = app.world().get::<Velocity>(character).unwrap().linvel;

        println!("PROOF: cruising={:?}, stopped={:?}", cruising, stopped);

        // PROOF: zero intent steers the goal velocity back to zero
        assert!(cruising.xz().length() > 4.0, "Precondition: was moving");
        assert!(
            stopped.xz().length() < 0.5,
            "Should brake to a stop, still moving at {:?}",
            stopped
        );
    }

    #[test]
    fn character_turns_to_face_its_movement() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(200.0, 0.5, 200.0));
        // Free rotation so the upright torque can steer the yaw
        let character = spawn_tilted_character(&mut app, Vec3::new(0.0, 1.5, 0.0), Quat::IDENTITY);

        // Strafe right: +X with the default view basis
        set_intent(&mut app, character, Vec2::new(1.0, 0.0));
        run_frames(&mut app, 180);

        let transform = app.world().get::<Transform>(character).unwrap();
        let forward = transform.rotation * Vec3::NEG_Z;

        println!("PROOF: forward={:?}", forward);

        // PROOF: the body yawed around to face +X
        assert!(
            forward.x > 0.8,
            "Body should face its movement direction, forward={:?}",
            forward
        );
    }
}

// ==================== Upright Torque Tests ====================

mod upright {
    use super::*;

    #[test]
    fn torque_opposes_tilt() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        // Tilted 0.5 rad about +Z
        let character = spawn_tilted_character(
            &mut app,
            Vec3::new(0.0, 1.5, 0.0),
            Quat::from_rotation_z(0.5),
        );

        tick(&mut app);

        let ext_force = app.world().get::<ExternalForce>(character).unwrap();

        println!("PROOF: torque={:?}", ext_force.torque);

        // PROOF: a positive tilt about Z gets a negative corrective torque
        assert!(
            ext_force.torque.z < -0.1,
            "Torque should oppose the tilt, got {:?}",
            ext_force.torque
        );
    }

    #[test]
    fn tilted_character_rights_itself() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        let initial_tilt = 0.5;
        let character = spawn_tilted_character(
            &mut app,
            Vec3::new(0.0, 1.5, 0.0),
            Quat::from_rotation_z(initial_tilt),
        );

        run_frames(&mut app, 300);

        let transform = app.world().get::<Transform>(character).unwrap();
        let tilt = transform.rotation.angle_between(Quat::IDENTITY);

        println!("PROOF: initial_tilt={}, final_tilt={}", initial_tilt, tilt);

        // PROOF: the PD torque converged the body back to upright
        assert!(
            tilt < 0.1,
            "Character should right itself, residual tilt={}",
            tilt
        );
    }

    #[test]
    fn no_torque_when_already_upright() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        let character = spawn_tilted_character(&mut app, Vec3::new(0.0, 1.5, 0.0), Quat::IDENTITY);

        tick(&mut app);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let ext_force = app.world().get::<ExternalForce>(character).unwrap();

        println!(
            "PROOF: rotation_angle={}, torque={:?}",
            controller.rotation_angle, ext_force.torque
        );

        // PROOF: aligned orientation produces no spring torque
        assert_eq!(controller.rotation_axis, Vec3::ZERO);
        assert!(
            ext_force.torque.length() < 0.05,
            "Upright body should get no meaningful torque, got {:?}",
            ext_force.torque
        );
    }
}

// ==================== Disable Gate Tests ====================

mod disabled {
    use super::*;

    #[test]
    fn disabling_releases_the_body_and_enabling_recovers_it() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0));
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));

        run_frames(&mut app, 300);
        let hover_y = app.world().get::<Transform>(character).unwrap().translation.y;

        // Disable: the controller must take its hands off the body
        app.world_mut().entity_mut(character).insert(ControllerDisabled);
        run_frames(&mut app, 40);

        let dropped_y = app.world().get::<Transform>(character).unwrap().translation.y;
        let ext_force = app.world().get::<ExternalForce>(character).unwrap();

        println!(
            "PROOF: hover_y={}, dropped_y={}, ext_force={:?}",
            hover_y, dropped_y, ext_force.force
        );

        assert!(
            dropped_y < hover_y - 0.1,
            "Disabled controller should let the body drop: {} -> {}",
            hover_y,
            dropped_y
        );
        assert!(
            ext_force.force.length() < 1e-3,
            "Controller forces should unwind to zero when disabled, got {:?}",
            ext_force.force
        );

        // Re-enable: it climbs back to the ride height
        app.world_mut()
            .entity_mut(character)
            .remove::<ControllerDisabled>();
        run_frames(&mut app, 300);

        let controller = app.world().get::<CharacterController>(character).unwrap();
        let config = app.world().get::<ControllerConfig>(character).unwrap();

        println!(
            "PROOF: recovered ground_distance={}",
            controller.ground_distance()
        );

        assert!(
            (controller.ground_distance() - config.ride_height).abs() < 0.1,
            "Re-enabled controller should hover again, ground_distance={}",
            controller.ground_distance()
        );
    }

    #[test]
    fn disabled_character_ignores_input() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(50.0, 0.5, 50.0));
        let character = spawn_character(&mut app, Vec3::new(0.0, 1.5, 0.0));
        app.world_mut().entity_mut(character).insert(ControllerDisabled);

        set_intent(&mut app, character, Vec2::new(0.0, 1.0));
        run_frames(&mut app, 30);

        let velocity = app.world().get::<Velocity>(character).unwrap().linvel;

        println!("PROOF: velocity={:?}", velocity);

        // PROOF: no locomotion force reaches a disabled body
        assert!(
            velocity.xz().length() < 0.01,
            "Disabled character should not move horizontally, got {:?}",
            velocity
        );
    }
}

// ==================== Force Preservation Tests ====================

mod force_preservation {
    use super::*;

    #[test]
    fn user_forces_survive_the_controller() {
        let mut app = create_test_app();

        spawn_ground(&mut app, Vec3::ZERO, Vec3::new(50.0, 0.5, 50.0));
        // Locomotion axes scaled to zero so the drive can't brake against
        // the push; the suspension still runs and still only touches Y.
        let character = spawn_character_with_config(
            &mut app,
            Vec3::new(0.0, 1.5, 0.0),
            ControllerConfig::default().with_force_scale(Vec3::ZERO),
        );

        run_frames(&mut app, 120);

        // A user system pushes the body sideways with a persistent force
        let push = Vec3::X * 2.0;
        if let Some(mut ext_force) = app.world_mut().get_mut::<ExternalForce>(character) {
            ext_force.force += push;
        }

        run_frames(&mut app, 60);

        let ext_force = app.world().get::<ExternalForce>(character).unwrap();
        let velocity = app.world().get::<Velocity>(character).unwrap().linvel;

        println!(
            "PROOF: ext_force.x={}, velocity.x={}",
            ext_force.force.x, velocity.x
        );

        // PROOF: the controller adds and removes only its own contribution,
        // so the user's push is still on the body and still acting.
        assert!(
            (ext_force.force.x - push.x).abs() < 1e-3,
            "User force should survive controller bookkeeping, got {}",
            ext_force.force.x
        );
        assert!(
            velocity.x > 0.5,
            "User force should keep accelerating the body, velocity.x={}",
            velocity.x
        );
    }
}
