use bevy::prelude::*;
use pathfinding::prelude::bfs_reach;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Smallest layout: a single open room inside a ring of walls.
pub const MIN_DIMENSION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    Open,
}

/// Grid step directions. North decreases the row index, east increases the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// World-space unit vector pointing from a cell towards its neighbor in this direction.
    pub fn world_normal(self) -> Vec3 {
        match self {
            Direction::North => Vec3::NEG_Z,
            Direction::South => Vec3::Z,
            Direction::East => Vec3::X,
            Direction::West => Vec3::NEG_X,
        }
    }
}

/// A (row, column) cell address. Equality is ordered: (1, 3) and (3, 1) are different cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Move `distance` cells in `direction`, or `None` when that would go below index zero.
    pub fn step(self, direction: Direction, distance: usize) -> Option<Coord> {
        match direction {
            Direction::North => self.row.checked_sub(distance).map(|row| Coord::new(row, self.col)),
            Direction::South => Some(Coord::new(self.row + distance, self.col)),
            Direction::East => Some(Coord::new(self.row, self.col + distance)),
            Direction::West => self.col.checked_sub(distance).map(|col| Coord::new(self.row, col)),
        }
    }

    /// World position of the cell center: (col * pitch, height, row * pitch).
    pub fn world_position(self, cell_pitch: f32, height: f32) -> Vec3 {
        Vec3::new(
            self.col as f32 * cell_pitch,
            height,
            self.row as f32 * cell_pitch,
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Force a requested dimension odd (even values grow by one) and at least [`MIN_DIMENSION`].
///
/// Panics on zero: a non-positive size is a broken caller contract.
pub fn normalize_dimension(requested: usize) -> usize {
    assert!(requested > 0, "maze dimensions must be positive, got {requested}");
    let odd = if requested % 2 == 0 { requested + 1 } else { requested };
    odd.max(MIN_DIMENSION)
}

/// Rectangular wall/open grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl Layout {
    fn filled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellState::Wall; rows * cols],
        }
    }

    /// The 3x3 default: walls surrounding a single empty cell.
    pub fn single_room() -> Self {
        let mut layout = Self::filled(MIN_DIMENSION, MIN_DIMENSION);
        layout.set(Coord::new(1, 1), CellState::Open);
        layout
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    pub fn get(&self, coord: Coord) -> Option<CellState> {
        if self.contains(coord) {
            Some(self.cells[coord.row * self.cols + coord.col])
        } else {
            None
        }
    }

    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord) == Some(CellState::Open)
    }

    fn set(&mut self, coord: Coord, state: CellState) {
        let index = coord.row * self.cols + coord.col;
        self.cells[index] = state;
    }

    /// In-bounds 4-connected neighbors of `coord`.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            coord
                .step(direction, 1)
                .filter(|next| self.contains(*next))
                .map(|next| (direction, next))
        })
    }

    /// Every open cell in row-major order.
    pub fn open_cells(&self) -> Vec<Coord> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| Coord::new(row, col)))
            .filter(|coord| self.is_open(*coord))
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == CellState::Open).count()
    }

    /// Number of odd-indexed rooms in the carving lattice.
    pub fn room_count(&self) -> usize {
        ((self.rows - 1) / 2) * ((self.cols - 1) / 2)
    }

    pub fn border_is_walled(&self) -> bool {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        (0..self.cols).all(|col| {
            !self.is_open(Coord::new(0, col)) && !self.is_open(Coord::new(last_row, col))
        }) && (0..self.rows).all(|row| {
            !self.is_open(Coord::new(row, 0)) && !self.is_open(Coord::new(row, last_col))
        })
    }

    /// True when every open cell reaches every other through 4-connected open steps.
    pub fn is_connected(&self) -> bool {
        let open = self.open_cells();
        let Some(&first) = open.first() else {
            return false;
        };
        let reached = bfs_reach(first, |coord| {
            self.neighbors(*coord)
                .filter(|(_, next)| self.is_open(*next))
                .map(|(_, next)| next)
                .collect::<Vec<_>>()
        })
        .count();
        reached == open.len()
    }

    /// Count of adjacent open/open pairs. A perfect maze has exactly `open_count() - 1`.
    pub fn passage_count(&self) -> usize {
        self.open_cells()
            .into_iter()
            .flat_map(|coord| {
                [Direction::South, Direction::East]
                    .into_iter()
                    .filter_map(move |direction| coord.step(direction, 1))
            })
            .filter(|next| self.is_open(*next))
            .count()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::single_room()
    }
}

impl fmt::Display for Layout {
    /// Top-down view with the highest row first: `#` wall, `.` open.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                let glyph = if self.is_open(Coord::new(row, col)) { '.' } else { '#' };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Carve a perfect maze with randomized depth-first backtracking.
///
/// Odd-indexed cells are rooms, the cells between them are walls that get
/// opened when the walk moves from one room to an unvisited neighbor. The
/// result is a spanning tree over all rooms, so every open cell is reachable
/// and no cycles exist. The border is never touched.
pub fn generate_layout<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Layout {
    let rows = normalize_dimension(rows);
    let cols = normalize_dimension(cols);
    let mut layout = Layout::filled(rows, cols);

    let room_rows = (rows - 1) / 2;
    let room_cols = (cols - 1) / 2;
    let room_index = |coord: Coord| (coord.row / 2) * room_cols + coord.col / 2;
    let mut visited = vec![false; room_rows * room_cols];

    let first = Coord::new(
        2 * rng.gen_range(0..room_rows) + 1,
        2 * rng.gen_range(0..room_cols) + 1,
    );
    layout.set(first, CellState::Open);
    visited[room_index(first)] = true;

    let mut stack = vec![first];
    let mut candidates = Vec::with_capacity(Direction::ALL.len());

    while let Some(&room) = stack.last() {
        candidates.clear();
        for direction in Direction::ALL {
            if let Some(next) = room.step(direction, 2) {
                if next.row < rows - 1 && next.col < cols - 1 && !visited[room_index(next)] {
                    candidates.push(next);
                }
            }
        }

        match candidates.choose(rng) {
            Some(&next) => {
                let wall = Coord::new((room.row + next.row) / 2, (room.col + next.col) / 2);
                layout.set(wall, CellState::Open);
                layout.set(next, CellState::Open);
                visited[room_index(next)] = true;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    layout
}
