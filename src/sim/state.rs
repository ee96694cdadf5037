//! Game state and core simulation types
//!
//! All state that must be persisted for save/restore and determinism lives
//! here, including the RNG and the deferred respawn queue.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, random_cell_where};
use super::respawn::RespawnQueue;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Frozen by the player; timers do not advance
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Temporary speed-up
    Boost,
    /// One collision-immunity charge
    Shield,
    /// Score bonus plus a permanent slow-down
    Bonus,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Boost, PowerUpKind::Shield, PowerUpKind::Bonus];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Boost => "Boost",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Bonus => "Bonus",
        }
    }
}

/// A power-up lying on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Cell,
    pub kind: PowerUpKind,
    /// Milliseconds until it disappears, always > 0 while on the board
    pub remaining_ms: f64,
}

/// The player's snake, head first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub body: VecDeque<Cell>,
    pub direction: Direction,
}

impl Snake {
    pub fn new(start: Cell, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([start]),
            direction,
        }
    }

    pub fn head(&self) -> Cell {
        // Length never drops below one
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Change heading unless `dir` would reverse onto the neck.
    ///
    /// Returns whether the heading was updated.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }
}

/// Notifications produced by the simulation for scoring, audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Food eaten; carries the new score
    AteFood { score: u64 },
    /// The head ran into an obstacle. Unless `GameOver` follows in the same
    /// tick a shield charge absorbed it and the obstacle is gone.
    HitObstacle { cell: Cell },
    /// The head ran into the body; absorbed unless `GameOver` follows
    HitSelf { cell: Cell },
    /// Power-up collected
    Collected(PowerUpKind),
    /// A new obstacle appeared after eating
    ObstacleSpawned { cell: Cell },
    /// Power-up timed out before it was collected
    PowerUpExpired(PowerUpKind),
    /// A deferred replacement power-up appeared
    PowerUpRespawned(PowerUpKind),
    /// Best score raised at the end of a run
    NewHighScore(u64),
    /// Run ended
    GameOver { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG; serialized so a restored game keeps the same sequence
    rng: Pcg32,
    /// Balance constants this game was built with
    pub tuning: Tuning,
    /// Bumped on every reset, tags deferred respawns
    pub generation: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,

    pub snake: Snake,
    pub food: Cell,
    /// Insertion order is kept for deterministic iteration
    pub obstacles: Vec<Cell>,
    pub power_ups: Vec<PowerUp>,
    pub respawns: RespawnQueue,

    pub score: u64,
    pub high_score: u64,
    /// Ticks per second before boost
    pub base_speed: u32,
    pub shield_charges: u32,
    pub boost_remaining_ms: f64,
}

impl GameState {
    /// Create a new game with the given seed, keeping `high_score` from storage
    pub fn new(seed: u64, high_score: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.check().map_err(SimError::InvalidTuning)?;
        let start = Cell::new(tuning.start_cell.0, tuning.start_cell.1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            base_speed: tuning.base_speed,
            generation: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            snake: Snake::new(start, Direction::Right),
            food: start,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            respawns: RespawnQueue::default(),
            score: 0,
            high_score,
            shield_charges: 0,
            boost_remaining_ms: 0.0,
            tuning,
        };
        state.populate()?;
        Ok(state)
    }

    /// Start a fresh game in place.
    ///
    /// Keeps the seed stream, tuning and high score; everything else
    /// (including pending respawns) is discarded and the generation bumped.
    pub fn restart(&mut self) -> Result<(), SimError> {
        let start = Cell::new(self.tuning.start_cell.0, self.tuning.start_cell.1);
        self.generation = self.generation.wrapping_add(1);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.snake = Snake::new(start, Direction::Right);
        self.food = start;
        self.obstacles.clear();
        self.power_ups.clear();
        self.respawns.clear();
        self.score = 0;
        self.base_speed = self.tuning.base_speed;
        self.shield_charges = 0;
        self.boost_remaining_ms = 0.0;
        self.populate()
    }

    /// Reject a deserialized state the simulation cannot advance
    pub fn check(&self) -> Result<(), SimError> {
        self.tuning.check().map_err(SimError::InvalidTuning)?;
        if self.base_speed < self.tuning.min_speed {
            return Err(SimError::InvalidState("base_speed is below min_speed"));
        }
        if self.snake.is_empty() {
            return Err(SimError::InvalidState("snake has no body"));
        }
        let n = self.tuning.grid_size;
        let on_grid = |c: &Cell| (0..n).contains(&c.x) && (0..n).contains(&c.y);
        if !self.snake.body.iter().all(on_grid) || !on_grid(&self.food) {
            return Err(SimError::InvalidState("entity lies off the grid"));
        }
        Ok(())
    }

    /// Place food, initial obstacles and one power-up of each kind
    fn populate(&mut self) -> Result<(), SimError> {
        let n = self.tuning.grid_size;
        let snake = &self.snake;
        self.food = random_cell_where(&mut self.rng, n, |c| !snake.contains(c))?;

        let start = self.snake.head();
        let zone = self.tuning.spawn_exclusion;
        for _ in 0..self.tuning.initial_obstacles {
            let cell = random_cell_where(&mut self.rng, n, |c| {
                let d = (c - start).abs();
                let in_zone = d.x < zone && d.y < zone;
                !in_zone && !self.snake.contains(c) && c != self.food && !self.obstacles.contains(&c)
            })?;
            self.obstacles.push(cell);
        }

        for kind in PowerUpKind::ALL {
            self.spawn_power_up(kind)?;
        }

        log::debug!(
            "Populated generation {}: food {:?}, {} obstacles",
            self.generation,
            self.food,
            self.obstacles.len()
        );
        Ok(())
    }

    /// Whether `cell` holds the snake, food, an obstacle or a power-up
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.contains(cell)
            || self.food == cell
            || self.obstacles.contains(&cell)
            || self.power_ups.iter().any(|p| p.pos == cell)
    }

    /// Uniformly random cell that nothing occupies
    pub fn random_empty_cell(&mut self) -> Result<Cell, SimError> {
        let n = self.tuning.grid_size;
        let Self {
            rng,
            snake,
            food,
            obstacles,
            power_ups,
            ..
        } = self;
        random_cell_where(rng, n, |c| {
            !snake.contains(c)
                && *food != c
                && !obstacles.contains(&c)
                && !power_ups.iter().any(|p| p.pos == c)
        })
    }

    /// Put a fresh power-up of `kind` on an empty cell
    pub fn spawn_power_up(&mut self, kind: PowerUpKind) -> Result<(), SimError> {
        let pos = self.random_empty_cell()?;
        self.power_ups.push(PowerUp {
            pos,
            kind,
            remaining_ms: self.tuning.power_up_lifetime_ms,
        });
        Ok(())
    }

    /// Draw a uniformly random power-up kind
    pub fn random_power_up_kind(&mut self) -> PowerUpKind {
        use rand::Rng;
        PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())]
    }

    /// Bernoulli draw from the game RNG
    pub fn roll(&mut self, chance: f64) -> bool {
        use rand::Rng;
        self.rng.random_bool(chance)
    }

    /// Ticks per second right now (base plus boost)
    pub fn current_speed(&self) -> u32 {
        if self.boost_remaining_ms > 0.0 {
            self.base_speed + self.tuning.boost_speed_bonus
        } else {
            self.base_speed
        }
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake.body,
            direction: self.snake.direction,
            food: self.food,
            obstacles: &self.obstacles,
            power_ups: &self.power_ups,
            paused: self.phase == GamePhase::Paused,
            game_over: self.phase == GamePhase::GameOver,
            score: self.score,
            high_score: self.high_score,
            speed: self.current_speed(),
            shield_charges: self.shield_charges,
            boost_remaining_ms: self.boost_remaining_ms,
            grid_size: self.tuning.grid_size,
        }
    }
}

/// Borrowed per-frame view handed to renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub obstacles: &'a [Cell],
    pub power_ups: &'a [PowerUp],
    pub paused: bool,
    pub game_over: bool,
    pub score: u64,
    pub high_score: u64,
    pub speed: u32,
    pub shield_charges: u32,
    pub boost_remaining_ms: f64,
    pub grid_size: i32,
}
