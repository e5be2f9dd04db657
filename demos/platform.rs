//! Platform Demo
//!
//! Spawns a floating character over a ground slab with a bobbing platform.
//! The character descends and hovers at the configured ride height, drives
//! around at up to max speed, turns to face its movement, and rides the
//! moving platform without bouncing.
//!
//! Controls:
//! - **WASD/Arrow Keys**: Move (relative to the camera)
//! - **Q**: Toggle the controller on/off (body goes ragdoll while off)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use floating_character_controller::prelude::*;

const RIDE_HEIGHT: f32 = 1.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platform Demo - Floating Character Controller".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(RapierDebugRenderPlugin::default())
        .add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_input,
                update_view_basis,
                toggle_controller,
                bob_platforms,
                debug_hover,
                camera_follow,
            ),
        )
        .run();
}

#[derive(Component)]
struct Player;

#[derive(Component)]
struct DebugText;

/// Vertical sine motion for kinematic platforms.
#[derive(Component)]
struct Bobbing {
    amplitude: f32,
    period: f32,
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Debug text
    commands.spawn((
        Text::new("PLATFORM DEMO\nSpawning character above the ground...\n"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        DebugText,
    ));

    // Ground slab, surface at y = 0
    commands.spawn((
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(20.0, 0.5, 20.0),
        Mesh3d(meshes.add(Cuboid::new(40.0, 1.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
    ));

    // Bobbing platform to the side: the suspension damps against its
    // velocity, so riding it should feel glued, not bouncy
    commands.spawn((
        Transform::from_xyz(6.0, 1.0, 0.0),
        RigidBody::KinematicVelocityBased,
        Velocity::default(),
        Collider::cuboid(2.0, 0.25, 2.0),
        Mesh3d(meshes.add(Cuboid::new(4.0, 0.5, 4.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.5, 0.4, 0.25))),
        Bobbing {
            amplitude: 1.5,
            period: 4.0,
        },
    ));

    // Player capsule, spawned well above the ride height
    println!("=== PLATFORM DEMO ===");
    println!("Ride height: {}", RIDE_HEIGHT);
    println!("Expected hover: capsule center ~{} above the ground", RIDE_HEIGHT);

    commands.spawn((
        Player,
        Transform::from_xyz(0.0, 4.0, 0.0),
        Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.6, 0.9))),
        CharacterController::new(),
        ControllerConfig::player().with_ride_height(RIDE_HEIGHT),
        MovementIntent::default(),
        ViewBasis::default(),
        Rapier3dCharacterBundle::new(),
        Collider::capsule_y(0.5, 0.3),
    ));
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut MovementIntent, With<Player>>,
) {
    for mut intent in &mut query {
        let mut input = Vec2::ZERO;
        if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
            input.y += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
            input.y -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
            input.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
            input.x += 1.0;
        }
        intent.set(input);
    }
}

/// Keep the player's input frame aligned with the camera.
fn update_view_basis(
    camera_query: Query<&GlobalTransform, With<Camera3d>>,
    mut player_query: Query<&mut ViewBasis, With<Player>>,
) {
    let Ok(camera) = camera_query.single() else {
        return;
    };
    for mut basis in &mut player_query {
        *basis = ViewBasis::from_view(camera);
    }
}

fn toggle_controller(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    query: Query<(Entity, Has<ControllerDisabled>), With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyQ) {
        return;
    }
    for (entity, disabled) in &query {
        if disabled {
            commands.entity(entity).remove::<ControllerDisabled>();
        } else {
            commands.entity(entity).insert(ControllerDisabled);
        }
    }
}

fn bob_platforms(time: Res<Time>, mut query: Query<(&Bobbing, &mut Velocity)>) {
    let t = time.elapsed_secs();
    for (bob, mut velocity) in &mut query {
        let angular = std::f32::consts::TAU / bob.period;
        velocity.linvel.y = bob.amplitude * angular * (angular * t).cos();
    }
}

fn debug_hover(
    mut text_query: Query<(&mut Text, &mut TextColor), With<DebugText>>,
    player_query: Query<
        (
            &Transform,
            &Velocity,
            &CharacterController,
            Option<&Grounded>,
            Has<ControllerDisabled>,
        ),
        With<Player>,
    >,
) {
    let Ok((transform, velocity, controller, grounded, disabled)) = player_query.single() else {
        return;
    };
    let Ok((mut text, mut color)) = text_query.single_mut() else {
        return;
    };

    let grounded_str = if grounded.is_some() { "YES" } else { "NO" };
    let state_str = if disabled { "OFF (Q to enable)" } else { "ON (Q to disable)" };
    let distance_str = if controller.ground_detected() {
        format!("{:.2}", controller.ground_distance())
    } else {
        "-".to_string()
    };

    **text = format!(
        "PLATFORM DEMO\n\
         Controller: {}\n\
         Player Y: {:.2}\n\
         Velocity: {:.1} {:.1} {:.1}\n\
         Ground detected: {}\n\
         Ground distance: {} (target {})\n\
         Grounded: {}",
        state_str,
        transform.translation.y,
        velocity.linvel.x,
        velocity.linvel.y,
        velocity.linvel.z,
        controller.ground_detected(),
        distance_str,
        RIDE_HEIGHT,
        grounded_str,
    );

    // Color by hover state
    if disabled {
        color.0 = Color::srgb(0.6, 0.6, 0.6); // Grey - controller off
    } else if (controller.ground_distance() - RIDE_HEIGHT).abs() < 0.2 {
        color.0 = Color::srgb(0.2, 0.8, 0.2); // Green - hovering at target
    } else if controller.ground_detected() {
        color.0 = Color::srgb(0.9, 0.9, 0.2); // Yellow - ground seen, not at target
    } else {
        color.0 = Color::srgb(0.9, 0.3, 0.3); // Red - airborne
    }
}

fn camera_follow(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Camera3d>)>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };

    let target = player.translation + Vec3::new(0.0, 6.0, 10.0);
    let blend = (4.0 * time.delta_secs()).min(1.0);
    camera.translation = camera.translation.lerp(target, blend);
    camera.look_at(player.translation, Vec3::Y);
}
