//! Maze layout carving, geometry synthesis and scene construction.

pub mod constructor;
pub mod grid;
pub mod mesh;

#[cfg(test)]
pub(crate) mod testing;

pub use constructor::{
    ConstructionSettings, ConstructorPhase, MARKER_HALF_EXTENT, MarkerKind, MazeBlueprint,
    MazeConstructor, MazeHost, TriggerMarker, pick_start_and_goal, plan_maze,
};
pub use grid::{CellState, Coord, Direction, Layout, generate_layout, normalize_dimension};
pub use mesh::{MaterialGroup, MazeGeometry, synthesize};
