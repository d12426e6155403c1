use crate::components::*;
use crate::game_logic::errors::MazeResult;
use crate::game_logic::session::{GoalOutcome, Session};
use crate::maze::{MarkerKind, MaterialGroup, MazeConstructor, MazeGeometry, MazeHost, TriggerMarker};
use crate::plugins::scene::MazeMaterials;
use crate::resources::{GameConfig, MazeRng};
use bevy::ecs::system::{SystemId, SystemParam};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub type SceneMazeConstructor = MazeConstructor<Entity>;

pub struct MazePlugin;

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TriggerCallbacks>()
            .add_systems(Startup, setup_maze_resources)
            .add_systems(PostStartup, start_game)
            .add_systems(Update, (handle_new_game_key, tick_regeneration).chain());
    }
}

/// One-shot systems the maze triggers call back into.
#[derive(Resource)]
pub struct TriggerCallbacks {
    pub on_start: SystemId<In<TriggerContact>>,
    pub on_goal: SystemId<In<TriggerContact>>,
}

impl FromWorld for TriggerCallbacks {
    fn from_world(world: &mut World) -> Self {
        Self {
            on_start: world.register_system(on_start_trigger),
            on_goal: world.register_system(on_goal_trigger),
        }
    }
}

/// Installs maze objects into the bevy world.
#[derive(SystemParam)]
pub struct SceneMazeHost<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: Res<'w, MazeMaterials>,
}

impl MazeHost for SceneMazeHost<'_, '_> {
    type Handle = Entity;
    type Callback = SystemId<In<TriggerContact>>;

    fn spawn_geometry(&mut self, geometry: &MazeGeometry) -> MazeResult<Entity> {
        // Build the collider first so a failure leaves the world untouched
        let collider = geometry.to_collider()?;

        let surfaces: Vec<(Handle<Mesh>, Handle<StandardMaterial>)> = MaterialGroup::ALL
            .into_iter()
            .filter(|group| geometry.quad_count(*group) > 0)
            .map(|group| {
                (
                    self.meshes.add(geometry.to_mesh(group)),
                    self.materials.for_group(group),
                )
            })
            .collect();

        let root = self
            .commands
            .spawn((
                Name::new("Maze"),
                Transform::default(),
                Visibility::default(),
                RigidBody::Fixed,
                collider,
                MazeGeometryRoot,
            ))
            .with_children(|parent| {
                for (mesh, material) in surfaces {
                    parent.spawn((Mesh3d(mesh), MeshMaterial3d(material)));
                }
            })
            .id();
        Ok(root)
    }

    fn spawn_marker(&mut self, marker: &TriggerMarker, callback: Self::Callback) -> Entity {
        let half = marker.half_extent;
        let mesh = self.meshes.add(Cuboid::new(half * 2.0, half * 2.0, half * 2.0));
        self.commands
            .spawn((
                Name::new(marker.kind.label()),
                Mesh3d(mesh),
                MeshMaterial3d(self.materials.for_marker(marker.kind)),
                Transform::from_translation(marker.position),
                Collider::cuboid(half, half, half),
                Sensor,
                ActiveEvents::COLLISION_EVENTS,
                ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
                TriggerRouter {
                    kind: marker.kind,
                    callback,
                },
            ))
            .id()
    }

    fn despawn(&mut self, handle: Entity) {
        self.commands.entity(handle).despawn();
    }
}

/// Everything needed to carve, install and enter a new maze.
#[derive(SystemParam)]
pub struct MazeBuilder<'w, 's> {
    host: SceneMazeHost<'w, 's>,
    constructor: ResMut<'w, SceneMazeConstructor>,
    rng: ResMut<'w, MazeRng>,
    config: Res<'w, GameConfig>,
    callbacks: Res<'w, TriggerCallbacks>,
    players: Query<'w, 's, &'static mut Transform, With<Player>>,
}

impl MazeBuilder<'_, '_> {
    /// Replace the current maze and move the player onto its start cell.
    pub fn install_next(&mut self) -> MazeResult<()> {
        let (rows, cols) = self.config.maze.random_dimensions(&mut self.rng.0);
        debug!("Requested maze size {rows}x{cols}");

        self.constructor.generate(
            &mut self.host,
            rows,
            cols,
            &mut self.rng.0,
            Some(self.callbacks.on_start),
            self.callbacks.on_goal,
        )?;

        let spawn = self
            .constructor
            .start_position(self.config.player.spawn_height);
        for mut transform in &mut self.players {
            transform.translation = spawn;
        }
        Ok(())
    }

    /// Install the next maze and hand control back to the player.
    ///
    /// On failure the previous maze stays in place and the player keeps walking it.
    pub fn enter_next_maze(&mut self, session: &mut Session) {
        if let Err(e) = self.install_next() {
            error!("Failed to build the next maze, keeping the current one: {e}");
        }
        session.maze_ready();
    }
}

fn setup_maze_resources(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(Session::new(config.session.regenerate_delay.as_duration()));
    commands.insert_resource(SceneMazeConstructor::new(
        config.maze.construction_settings(),
    ));
    commands.insert_resource(MazeRng::from_seed(config.maze.seed));
}

fn start_game(mut session: ResMut<Session>, mut builder: MazeBuilder, time: Res<Time>) {
    session.start_new_game(time.elapsed());
    builder.enter_next_maze(&mut session);
    info!("New game started");
}

fn handle_new_game_key(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<Session>,
    mut builder: MazeBuilder,
    time: Res<Time>,
) {
    if !keys.just_pressed(KeyCode::KeyN) {
        return;
    }
    if let Some(token) = session.start_new_game(time.elapsed()) {
        info!("New game requested, dropped pending regeneration {token:?}");
    }
    builder.enter_next_maze(&mut session);
    info!("New game started");
}

fn tick_regeneration(time: Res<Time>, mut session: ResMut<Session>, mut builder: MazeBuilder) {
    if let Some(token) = session.tick(time.delta()) {
        info!("Regeneration {token:?} fired");
        builder.enter_next_maze(&mut session);
    }
}

fn on_goal_trigger(
    In(contact): In<TriggerContact>,
    mut session: ResMut<Session>,
    mut constructor: ResMut<SceneMazeConstructor>,
    mut host: SceneMazeHost,
) {
    // Events queued for a marker of an already disposed maze
    if !constructor.is_marker_owned(MarkerKind::Goal, contact.trigger) {
        debug!("Ignoring stale goal contact on {}", contact.trigger);
        return;
    }

    if let GoalOutcome::Scored { score } = session.on_goal_entered() {
        info!("{} reached, score is now {score}", MarkerKind::Goal.label());
        constructor.destroy_marker(&mut host, MarkerKind::Goal);
    }
}

fn on_start_trigger(
    In(contact): In<TriggerContact>,
    mut session: ResMut<Session>,
    constructor: Res<SceneMazeConstructor>,
) {
    if !constructor.is_marker_owned(MarkerKind::Start, contact.trigger) {
        return;
    }
    if session.on_start_entered() {
        info!("Back at the start after the goal, next maze is coming");
    }
}
