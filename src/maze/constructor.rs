use super::grid::{Coord, Layout, generate_layout, normalize_dimension};
use super::mesh::{MazeGeometry, synthesize};
use crate::game_logic::errors::MazeResult;
use bevy::prelude::*;
use rand::Rng;
use std::fmt::Debug;

/// Half the edge length of a trigger cube; markers rest on the floor.
pub const MARKER_HALF_EXTENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Start,
    Goal,
}

impl MarkerKind {
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Start => "Start Trigger",
            MarkerKind::Goal => "Treasure",
        }
    }
}

/// Placement request for a trigger volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerMarker {
    pub kind: MarkerKind,
    pub cell: Coord,
    pub position: Vec3,
    pub half_extent: f32,
}

/// The render/collision collaborator a maze is installed into.
pub trait MazeHost {
    type Handle: Copy + PartialEq + Debug;
    type Callback;

    /// Display and collide against `geometry`. Spawns nothing when it fails.
    fn spawn_geometry(&mut self, geometry: &MazeGeometry) -> MazeResult<Self::Handle>;

    /// Place a trigger volume that forwards overlap-enter events to `callback`.
    fn spawn_marker(&mut self, marker: &TriggerMarker, callback: Self::Callback) -> Self::Handle;

    fn despawn(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructionSettings {
    pub cell_pitch: f32,
    pub wall_height: f32,
    pub place_start_trigger: bool,
}

impl Default for ConstructionSettings {
    fn default() -> Self {
        Self {
            cell_pitch: 3.75,
            wall_height: 3.5,
            place_start_trigger: false,
        }
    }
}

/// Idle until the first maze is installed, Ready while one is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructorPhase {
    #[default]
    Idle,
    /// Only held inside [`MazeConstructor::generate`]. Callers observe Idle or Ready.
    Generating,
    Ready,
}

/// A fully built maze that has not been installed into a host yet.
#[derive(Debug, Clone)]
pub struct MazeBlueprint {
    pub layout: Layout,
    pub start: Coord,
    pub goal: Coord,
    pub geometry: MazeGeometry,
}

/// Sample a start and a goal uniformly from the open cells.
///
/// The goal is drawn from the open cells other than the start whenever more
/// than one exists. Panics on a layout without open cells.
pub fn pick_start_and_goal<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> (Coord, Coord) {
    let candidates = layout.open_cells();
    assert!(
        !candidates.is_empty(),
        "carved layout has no open cells to place markers on"
    );

    let start = candidates[rng.gen_range(0..candidates.len())];
    let goal = if candidates.len() > 1 {
        let remaining: Vec<Coord> = candidates
            .iter()
            .copied()
            .filter(|cell| *cell != start)
            .collect();
        remaining[rng.gen_range(0..remaining.len())]
    } else {
        start
    };

    debug!(
        "From {} options, picked start {start} and goal {goal}",
        candidates.len()
    );
    (start, goal)
}

/// Carve a layout, choose the markers and synthesize geometry without touching any host.
pub fn plan_maze<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    settings: &ConstructionSettings,
    rng: &mut R,
) -> MazeBlueprint {
    let layout = generate_layout(rows, cols, rng);
    let (start, goal) = pick_start_and_goal(&layout, rng);
    let geometry = synthesize(&layout, settings.cell_pitch, settings.wall_height);
    MazeBlueprint {
        layout,
        start,
        goal,
        geometry,
    }
}

#[derive(Debug)]
struct OwnedObjects<H> {
    geometry: Option<H>,
    start_marker: Option<H>,
    goal_marker: Option<H>,
}

impl<H> Default for OwnedObjects<H> {
    fn default() -> Self {
        Self {
            geometry: None,
            start_marker: None,
            goal_marker: None,
        }
    }
}

impl<H: Copy> OwnedObjects<H> {
    fn handles(&self) -> Vec<H> {
        [self.geometry, self.start_marker, self.goal_marker]
            .into_iter()
            .flatten()
            .collect()
    }

    fn marker_mut(&mut self, kind: MarkerKind) -> &mut Option<H> {
        match kind {
            MarkerKind::Start => &mut self.start_marker,
            MarkerKind::Goal => &mut self.goal_marker,
        }
    }
}

/// Owns the current layout and every scene object created for it.
///
/// Objects are tracked by handle, so disposal destroys exactly what this
/// constructor spawned and nothing else.
#[derive(Resource, Debug)]
pub struct MazeConstructor<H: Send + Sync + 'static> {
    settings: ConstructionSettings,
    phase: ConstructorPhase,
    layout: Layout,
    start: Coord,
    goal: Coord,
    owned: OwnedObjects<H>,
    generation: u64,
}

impl<H> MazeConstructor<H>
where
    H: Copy + PartialEq + Debug + Send + Sync + 'static,
{
    pub fn new(settings: ConstructionSettings) -> Self {
        let layout = Layout::single_room();
        let center = Coord::new(1, 1);
        Self {
            settings,
            phase: ConstructorPhase::Idle,
            layout,
            start: center,
            goal: center,
            owned: OwnedObjects::default(),
            generation: 0,
        }
    }

    pub fn settings(&self) -> &ConstructionSettings {
        &self.settings
    }

    /// Never [`ConstructorPhase::Generating`] between calls; a failed generate restores the prior phase.
    pub fn phase(&self) -> ConstructorPhase {
        self.phase
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    /// How many mazes have been installed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// World position for the player at the start cell.
    pub fn start_position(&self, height: f32) -> Vec3 {
        self.start.world_position(self.settings.cell_pitch, height)
    }

    pub fn owned_handles(&self) -> Vec<H> {
        self.owned.handles()
    }

    pub fn marker(&self, kind: MarkerKind) -> TriggerMarker {
        let cell = match kind {
            MarkerKind::Start => self.start,
            MarkerKind::Goal => self.goal,
        };
        TriggerMarker {
            kind,
            cell,
            position: cell.world_position(self.settings.cell_pitch, MARKER_HALF_EXTENT),
            half_extent: MARKER_HALF_EXTENT,
        }
    }

    /// Build and install a new maze, replacing the current one.
    ///
    /// The replacement is all-or-nothing: if the host cannot install the new
    /// geometry the previous maze stays exactly as it was.
    pub fn generate<Host, R>(
        &mut self,
        host: &mut Host,
        rows: usize,
        cols: usize,
        rng: &mut R,
        on_start: Option<Host::Callback>,
        on_goal: Host::Callback,
    ) -> MazeResult<()>
    where
        Host: MazeHost<Handle = H>,
        R: Rng + ?Sized,
    {
        let rows = normalize_dimension(rows);
        let cols = normalize_dimension(cols);
        let previous_phase = self.phase;
        self.phase = ConstructorPhase::Generating;

        let blueprint = plan_maze(rows, cols, &self.settings, rng);
        let geometry = match host.spawn_geometry(&blueprint.geometry) {
            Ok(handle) => handle,
            Err(err) => {
                self.phase = previous_phase;
                return Err(err);
            }
        };

        let disposed = self.dispose_old_maze(host);
        if disposed > 0 {
            debug!("Disposed {disposed} objects from the previous maze");
        }

        self.layout = blueprint.layout;
        self.start = blueprint.start;
        self.goal = blueprint.goal;
        self.owned.geometry = Some(geometry);

        if self.settings.place_start_trigger {
            if let Some(callback) = on_start {
                let marker = self.marker(MarkerKind::Start);
                self.owned.start_marker = Some(host.spawn_marker(&marker, callback));
            }
        }
        let marker = self.marker(MarkerKind::Goal);
        self.owned.goal_marker = Some(host.spawn_marker(&marker, on_goal));

        self.generation += 1;
        self.phase = ConstructorPhase::Ready;
        info!(
            "Maze #{} ready: {rows}x{cols}, {} open cells, start {}, goal {}",
            self.generation,
            self.layout.open_count(),
            self.start,
            self.goal
        );
        Ok(())
    }

    /// Destroy every object spawned for the current maze. Safe to call repeatedly.
    pub fn dispose_old_maze<Host: MazeHost<Handle = H>>(&mut self, host: &mut Host) -> usize {
        let handles = self.owned.handles();
        for handle in &handles {
            host.despawn(*handle);
        }
        self.owned = OwnedObjects::default();
        self.phase = ConstructorPhase::Idle;
        handles.len()
    }

    /// Destroy one marker, returning whether it was still alive.
    pub fn destroy_marker<Host: MazeHost<Handle = H>>(
        &mut self,
        host: &mut Host,
        kind: MarkerKind,
    ) -> bool {
        match self.owned.marker_mut(kind).take() {
            Some(handle) => {
                host.despawn(handle);
                true
            }
            None => false,
        }
    }

    pub fn is_marker_owned(&self, kind: MarkerKind, handle: H) -> bool {
        let slot = match kind {
            MarkerKind::Start => self.owned.start_marker,
            MarkerKind::Goal => self.owned.goal_marker,
        };
        slot == Some(handle)
    }
}
