//! Snake Rush - A toroidal-grid snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, entities, tick, timing)
//! - `session`: Command surface, event fan-out and best-score persistence
//! - `highscores`: Best-score storage backends
//! - `tuning`: Data-driven game balance
//! - `error`: Error types shared by the core

pub mod error;
pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{RestoreError, SimError, TuningError};
pub use highscores::{HighScoreStore, MemoryStore};
pub use session::{EventSink, LogSink, Renderer, Session};
pub use tuning::Tuning;

use glam::IVec2;

/// Engine constants that are not part of game balance
pub mod consts {
    /// Maximum ticks simulated by one frame call; backlog beyond this is
    /// discarded (e.g. after a backgrounded tab resumes)
    pub const MAX_TICKS_PER_FRAME: u32 = 30;

    /// Milliseconds per second, the numerator of every tick interval
    pub const MS_PER_SECOND: f64 = 1000.0;

    /// LocalStorage key for the best score (wasm32 only)
    pub const HIGH_SCORE_KEY: &str = "snake_rush_high";

    /// Default best-score file name for native builds
    pub const HIGH_SCORE_FILE: &str = "snake_rush_high.json";
}

/// Wrap a position onto an `n`×`n` torus.
///
/// Componentwise `rem_euclid`, so the result is always in `[0, n)` even for
/// negative inputs.
#[inline]
pub fn wrap(pos: IVec2, n: i32) -> IVec2 {
    IVec2::new(pos.x.rem_euclid(n), pos.y.rem_euclid(n))
}
