use crate::game_logic::movement::LookAngles;
use crate::maze::MarkerKind;
use bevy::ecs::system::SystemId;
use bevy::prelude::*;

#[derive(Component, Default)]
pub struct Player {
    pub look: LookAngles,
}

/// Child camera of the player; carries the head pitch.
#[derive(Component)]
pub struct PlayerCamera;

#[derive(Component)]
pub struct SceneLight;

/// Root entity of one maze's floor and wall meshes.
#[derive(Component)]
pub struct MazeGeometryRoot;

/// Who touched which trigger. Passed to the trigger's callback system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerContact {
    pub trigger: Entity,
    pub other: Entity,
}

/// Routes overlap-enter events on this sensor to a registered one-shot system.
#[derive(Component)]
pub struct TriggerRouter {
    pub kind: MarkerKind,
    pub callback: SystemId<In<TriggerContact>>,
}

#[derive(Component)]
pub struct GameUI;

#[derive(Component)]
pub struct TimeLabel;

#[derive(Component)]
pub struct ScoreLabel;

/// Text node showing the current layout as `#`/`.` rows.
#[derive(Component)]
pub struct DebugOverlay;
