use crate::components::*;
use crate::game_logic::session::Session;
use crate::plugins::maze::SceneMazeConstructor;
use crate::plugins::ui_common::{capture_pointer, handle_exit_events};
use crate::resources::GameConfig;
use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_game_ui)
            .add_systems(
                Update,
                (
                    handle_exit_events,
                    capture_pointer,
                    toggle_debug_overlay,
                    update_hud,
                    update_debug_overlay,
                ),
            );
    }
}

fn label_font(config: &GameConfig) -> TextFont {
    TextFont {
        font_size: config.ui.hud_font_size,
        ..default()
    }
}

fn setup_game_ui(mut commands: Commands, config: Res<GameConfig>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::FlexStart,
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            GameUI,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::SpaceBetween,
                    ..default()
                })
                .with_children(|hud| {
                    hud.spawn((
                        Text::new("0"),
                        label_font(&config),
                        TextColor(Color::WHITE),
                        TimeLabel,
                    ));
                    hud.spawn((
                        Text::new("0"),
                        label_font(&config),
                        TextColor(Color::srgb(0.95, 0.8, 0.2)),
                        ScoreLabel,
                    ));
                });

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.9, 0.7)),
                if config.ui.show_debug {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                },
                DebugOverlay,
            ));

            parent.spawn((
                Text::new("Click=Capture Mouse, WASD=Move, N=New Game, F1=Map, Esc=Quit"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

type TimeLabelFilter = (With<TimeLabel>, Without<ScoreLabel>);
type ScoreLabelFilter = (With<ScoreLabel>, Without<TimeLabel>);

fn update_hud(
    time: Res<Time>,
    session: Res<Session>,
    mut time_labels: Query<&mut Text, TimeLabelFilter>,
    mut score_labels: Query<&mut Text, ScoreLabelFilter>,
) {
    // The timer display holds still while the player cannot move
    if session.player_enabled() {
        let label = session.time_label(time.elapsed());
        for mut text in &mut time_labels {
            if text.0 != label {
                text.0 = label.clone();
            }
        }
    }

    if session.is_changed() {
        for mut text in &mut score_labels {
            text.0 = session.score_label();
        }
    }
}

fn toggle_debug_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    mut overlays: Query<&mut Visibility, With<DebugOverlay>>,
) {
    if !keys.just_pressed(KeyCode::F1) {
        return;
    }
    for mut visibility in &mut overlays {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
    }
}

fn update_debug_overlay(
    constructor: Option<Res<SceneMazeConstructor>>,
    mut overlays: Query<&mut Text, With<DebugOverlay>>,
) {
    let Some(constructor) = constructor else { return };
    if !constructor.is_changed() {
        return;
    }
    let map = constructor.layout().to_string();
    for mut text in &mut overlays {
        text.0 = map.clone();
    }
}
