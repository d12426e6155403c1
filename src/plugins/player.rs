use crate::components::*;
use crate::game_logic::movement::{
    FpsMovementConfig, apply_gravity, keyboard_input, planar_translation,
};
use crate::game_logic::session::Session;
use crate::resources::GameConfig;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

const PLAYER_RADIUS: f32 = 0.4;
const PLAYER_HALF_HEIGHT: f32 = 0.5;
const EYE_HEIGHT: f32 = 0.7;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player)
            .add_systems(Update, (look_around, move_player).chain());
    }
}

fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    commands
        .spawn((
            Name::new("Player"),
            Transform::from_xyz(0.0, config.player.spawn_height, 0.0),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS),
            KinematicCharacterController {
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                offset: CharacterLength::Absolute(0.01),
                slide: true,
                ..default()
            },
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            Player::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Camera3d::default(),
                Projection::from(PerspectiveProjection {
                    fov: 70.0_f32.to_radians(),
                    ..default()
                }),
                Transform::from_xyz(0.0, EYE_HEIGHT, 0.0),
                PlayerCamera,
            ));
        });
}

fn pointer_captured(window: &Window) -> bool {
    window.cursor_options.grab_mode != CursorGrabMode::None
}

fn look_around(
    mouse_motion: Res<AccumulatedMouseMotion>,
    session: Res<Session>,
    config: Res<GameConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut players: Query<(&mut Player, &mut Transform), Without<PlayerCamera>>,
    mut cameras: Query<&mut Transform, With<PlayerCamera>>,
) {
    if !session.player_enabled() || mouse_motion.delta == Vec2::ZERO {
        return;
    }
    let Ok(window) = windows.single() else { return };
    if !pointer_captured(window) {
        return;
    }

    let movement = FpsMovementConfig::default();
    let sensitivity = config.player.mouse_sensitivity.get();
    for (mut player, mut transform) in &mut players {
        player.look = player.look.apply_mouse(mouse_motion.delta, sensitivity, movement);
        transform.rotation = player.look.body_rotation();
        for mut camera in &mut cameras {
            camera.rotation = player.look.head_rotation();
        }
    }
}

fn move_player(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    session: Res<Session>,
    config: Res<GameConfig>,
    mut players: Query<(&Player, &mut KinematicCharacterController)>,
) {
    if !session.player_enabled() {
        return;
    }

    let movement = FpsMovementConfig::default();
    let delta_time = time.delta_secs();
    let input = keyboard_input(&keys);
    for (player, mut controller) in &mut players {
        let planar = planar_translation(
            input,
            player.look.yaw,
            config.player.move_speed.get(),
            delta_time,
        );
        controller.translation = Some(apply_gravity(planar, delta_time, movement));
    }
}
