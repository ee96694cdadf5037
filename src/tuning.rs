//! Data-driven game balance
//!
//! Every gameplay constant lives here so hosts can ship a JSON override
//! without recompiling. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Board ===
    /// Width and height of the square toroidal grid, in cells
    pub grid_size: i32,
    /// Cell the snake starts on after a reset
    pub start_cell: (i32, i32),
    /// Obstacles placed by a reset
    pub initial_obstacles: usize,
    /// Initial obstacles keep `|dx| < n && |dy| < n` clear around the start cell
    pub spawn_exclusion: i32,
    /// Chance of a new obstacle each time food is eaten
    pub obstacle_chance: f64,

    // === Speed (ticks per second) ===
    pub base_speed: u32,
    /// Floor for Bonus slow-downs
    pub min_speed: u32,
    /// Added to the base speed while a boost is active
    pub boost_speed_bonus: u32,
    pub boost_duration_ms: f64,

    // === Scoring ===
    pub food_score: u64,
    pub bonus_score: u64,

    // === Power-ups ===
    /// Lifetime of a freshly spawned power-up
    pub power_up_lifetime_ms: f64,
    /// Delay before a collected power-up is replaced
    pub power_up_respawn_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size: 30,
            start_cell: (5, 5),
            initial_obstacles: 20,
            spawn_exclusion: 12,
            obstacle_chance: 0.2,

            base_speed: 6,
            min_speed: 4,
            boost_speed_bonus: 4,
            boost_duration_ms: 4000.0,

            food_score: 1,
            bonus_score: 5,

            power_up_lifetime_ms: 100_000.0,
            power_up_respawn_delay_ms: 2000.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        self.check().map_err(TuningError::Invalid)
    }

    /// Same checks as [`Tuning::validate`], reporting only the reason
    pub fn check(&self) -> Result<(), &'static str> {
        if self.grid_size < 1 {
            return Err("grid_size must be at least 1");
        }
        let (sx, sy) = self.start_cell;
        if !(0..self.grid_size).contains(&sx) || !(0..self.grid_size).contains(&sy) {
            return Err("start_cell must lie on the grid");
        }
        if self.min_speed == 0 {
            return Err("min_speed must be positive");
        }
        if self.base_speed < self.min_speed {
            return Err("base_speed must be at least min_speed");
        }
        if !(0.0..=1.0).contains(&self.obstacle_chance) {
            return Err("obstacle_chance must be between 0 and 1");
        }
        // Negated comparisons so NaN is rejected too
        if !(self.power_up_lifetime_ms > 0.0) {
            return Err("power_up_lifetime_ms must be positive");
        }
        if !(self.boost_duration_ms >= 0.0) || !(self.power_up_respawn_delay_ms >= 0.0) {
            return Err("durations must not be negative");
        }
        Ok(())
    }
}
