//! Toroidal grid geometry and empty-cell sampling

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A grid cell, each component in `[0, N)`
pub type Cell = IVec2;

/// Movement direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for one tick
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Map a key name (arrows, WASD, or a plain direction word) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowup" | "w" | "up" => Some(Direction::Up),
            "arrowdown" | "s" | "down" => Some(Direction::Down),
            "arrowleft" | "a" | "left" => Some(Direction::Left),
            "arrowright" | "d" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Step one cell from `pos` in `dir`, wrapping at the edges
#[inline]
pub fn step(pos: Cell, dir: Direction, grid_size: i32) -> Cell {
    crate::wrap(pos + dir.delta(), grid_size)
}

/// Pick a cell uniformly among those for which `is_free` holds.
///
/// Enumerates the grid once and draws a single index, so it always
/// terminates; a full grid yields [`SimError::NoSpaceAvailable`].
pub fn random_cell_where<R, F>(rng: &mut R, grid_size: i32, is_free: F) -> Result<Cell, SimError>
where
    R: Rng,
    F: Fn(Cell) -> bool,
{
    let free: Vec<Cell> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Cell::new(x, y)))
        .filter(|&c| is_free(c))
        .collect();

    if free.is_empty() {
        return Err(SimError::NoSpaceAvailable);
    }
    Ok(free[rng.random_range(0..free.len())])
}
