//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only, stored in the state
//! - Stable iteration order (insertion order of entities)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod respawn;
pub mod state;
pub mod tick;
pub mod timing;

pub use collision::{Collision, check_collision};
pub use grid::{Cell, Direction, random_cell_where, step};
pub use respawn::{PendingRespawn, RespawnQueue};
pub use state::{GameEvent, GamePhase, GameState, PowerUp, PowerUpKind, Snake, Snapshot};
pub use tick::tick;
pub use timing::FrameClock;
