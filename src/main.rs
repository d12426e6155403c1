use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use mazerun::config::load_config_or_default;
use mazerun::plugins::*;

fn main() {
    let config = load_config_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Mazerun".into(),
                resolution: (config.ui.window_width, config.ui.window_height).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(config)
        .add_plugins((
            ScenePlugin,
            PlayerPlugin,
            TriggerRouterPlugin,
            MazePlugin,
            UiPlugin,
        ))
        .run();
}
