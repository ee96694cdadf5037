//! Collision classification for a candidate head cell

use super::grid::Cell;
use super::state::Snake;

/// What a candidate head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// A non-head snake cell
    SelfHit,
    /// An obstacle cell
    Obstacle,
}

/// Classify a move onto `next`.
///
/// The whole body except the head counts, including the tail cell that is
/// about to move away. When both apply, the obstacle wins so a shield
/// charge also clears it.
pub fn check_collision(next: Cell, snake: &Snake, obstacles: &[Cell]) -> Option<Collision> {
    if obstacles.contains(&next) {
        return Some(Collision::Obstacle);
    }
    if snake.body.iter().skip(1).any(|&c| c == next) {
        return Some(Collision::SelfHit);
    }
    None
}
