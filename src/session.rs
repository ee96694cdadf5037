//! Game session controller
//!
//! Owns the game state exclusively and exposes the command surface used by
//! input handling. Events produced by the simulation are used to persist the
//! best score, then fanned out to registered sinks and returned to the host.

use serde::{Deserialize, Serialize};

use crate::error::{RestoreError, SimError};
use crate::highscores::HighScoreStore;
use crate::sim::{Direction, FrameClock, GameEvent, GamePhase, GameState, Snapshot};
use crate::tuning::Tuning;

/// Receives simulation events (audio, notifications, HUD text)
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Draws one frame from a read-only snapshot
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>);
}

/// Sink that writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameOver { score } => log::info!("Game over (score {})", score),
            GameEvent::NewHighScore(score) => log::info!("New high score: {}", score),
            GameEvent::Collected(kind) => log::info!("Collected {}", kind.as_str()),
            other => log::debug!("{:?}", other),
        }
    }
}

/// Everything needed to resume a session exactly where it left off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSession {
    pub state: GameState,
    pub clock: FrameClock,
}

/// One running game plus its collaborators
pub struct Session {
    state: GameState,
    clock: FrameClock,
    store: Box<dyn HighScoreStore>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Session {
    /// Start a game; the best score is read from `store` once, here
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn HighScoreStore>) -> Result<Self, SimError> {
        let high_score = store.load_high_score();
        let state = GameState::new(seed, high_score, tuning)?;
        log::info!("Session started (seed {}, best {})", seed, high_score);
        Ok(Self {
            state,
            clock: FrameClock::new(),
            store,
            sinks: Vec::new(),
        })
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.snapshot());
    }

    // === Commands ===

    /// Change heading; a reversal is silently ignored
    pub fn turn(&mut self, dir: Direction) -> bool {
        self.state.snake.turn(dir)
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    /// Start a fresh game. The best score survives; pending respawns do not.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.clock.clear();
        if let Err(err) = self.state.restart() {
            log::error!("Reset failed: {}", err);
            self.state.phase = GamePhase::Paused;
            return Err(err);
        }
        log::info!("Reset (generation {})", self.state.generation);
        Ok(())
    }

    // === Frame driver ===

    /// Advance by `dt_ms` of wall-clock time and return this frame's events.
    ///
    /// On [`SimError::NoSpaceAvailable`] the session pauses; events raised
    /// before the failure are still delivered to sinks.
    pub fn frame(&mut self, dt_ms: f64) -> Result<Vec<GameEvent>, SimError> {
        let mut events = Vec::new();
        let result = self.clock.advance(&mut self.state, dt_ms, &mut events);
        self.dispatch(&events);

        match result {
            Ok(_) => Ok(events),
            Err(err) => {
                log::error!("Simulation halted: {}", err);
                self.state.phase = GamePhase::Paused;
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::NewHighScore(score) = event {
                self.store.save_high_score(*score);
            }
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
    }

    // === Save / restore ===

    /// Serialize the full session (state, RNG, pending respawns, residual time)
    pub fn save_state(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SavedSession {
            state: self.state.clone(),
            clock: self.clock.clone(),
        })
    }

    /// Replace the running game with a saved one.
    ///
    /// The better of the saved and the current best score is kept, and
    /// written to the store when the save holds the better one. A save that
    /// fails validation leaves the running game untouched.
    pub fn restore_state(&mut self, json: &str) -> Result<(), RestoreError> {
        let saved: SavedSession = serde_json::from_str(json)?;
        saved.state.check()?;

        let best = saved.state.high_score;
        if best > self.state.high_score {
            self.store.save_high_score(best);
        }
        let best = best.max(self.state.high_score);
        self.state = saved.state;
        self.state.high_score = best;
        self.clock = saved.clock;
        log::info!("Restored session at tick {}", self.state.time_ticks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::{Cell, PowerUp, PowerUpKind};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store whose contents stay visible to the test after boxing
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl HighScoreStore for SharedStore {
        fn load_high_score(&self) -> u64 {
            self.0.borrow().load_high_score()
        }
        fn save_high_score(&mut self, score: u64) {
            self.0.borrow_mut().save_high_score(score);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<GameEvent>>>);

    impl EventSink for RecordingSink {
        fn on_event(&mut self, event: &GameEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    fn session(seed: u64) -> Session {
        Session::new(seed, Tuning::default(), Box::new(MemoryStore::new())).unwrap()
    }

    /// Clear the board around a one-cell snake at (5,5) heading right
    fn clear_board(session: &mut Session) {
        session.state.obstacles.clear();
        session.state.power_ups.clear();
        session.state.food = Cell::new(20, 20);
    }

    #[test]
    fn test_loads_best_score_from_store() {
        let session = Session::new(1, Tuning::default(), Box::new(MemoryStore::with_score(99))).unwrap();
        assert_eq!(session.state().high_score, 99);
    }

    #[test]
    fn test_pause_resume() {
        let mut session = session(1);
        clear_board(&mut session);
        session.pause();
        assert_eq!(session.phase(), GamePhase::Paused);
        assert!(session.snapshot().paused);
        assert!(session.frame(1000.0).unwrap().is_empty());
        assert_eq!(session.state().snake.head(), Cell::new(5, 5));

        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::Playing);
        session.frame(1000.0).unwrap();
        assert_eq!(session.state().snake.head(), Cell::new(11, 5));
    }

    #[test]
    fn test_paused_cannot_reach_game_over() {
        let mut session = session(1);
        clear_board(&mut session);
        session.state.obstacles.push(Cell::new(6, 5));
        session.pause();
        session.frame(5000.0).unwrap();
        assert_eq!(session.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_game_over_is_terminal_until_reset() {
        let mut session = session(1);
        clear_board(&mut session);
        session.state.obstacles.push(Cell::new(6, 5));
        session.frame(1000.0).unwrap();
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.resume();
        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.reset().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_reset_preserves_high_score() {
        let store = SharedStore::default();
        store.0.borrow_mut().save_high_score(4);
        let mut session = Session::new(3, Tuning::default(), Box::new(store.clone())).unwrap();
        clear_board(&mut session);
        session.state.score = 10;
        session.state.obstacles.push(Cell::new(6, 5));

        let events = session.frame(1000.0).unwrap();
        assert!(events.contains(&GameEvent::NewHighScore(10)));
        assert_eq!(store.0.borrow().load_high_score(), 10);

        session.reset().unwrap();
        assert_eq!(session.state().high_score, 10);
        assert_eq!(session.state().score, 0);
        session.reset().unwrap();
        assert_eq!(session.state().high_score, 10);
        // The seeded value plus the new record
        assert_eq!(store.0.borrow().saves, 2);
    }

    #[test]
    fn test_sinks_receive_events() {
        let sink = RecordingSink::default();
        let mut session = session(8);
        session.add_sink(Box::new(sink.clone()));
        session.add_sink(Box::new(LogSink));
        clear_board(&mut session);
        session.state.food = Cell::new(6, 5);

        let events = session.frame(200.0).unwrap();
        assert!(!events.is_empty());
        assert_eq!(*sink.0.borrow(), events);
    }

    #[test]
    fn test_reset_cancels_pending_respawn() {
        let mut session = session(2);
        clear_board(&mut session);
        session.state.power_ups.push(PowerUp {
            pos: Cell::new(6, 5),
            kind: PowerUpKind::Shield,
            remaining_ms: 50_000.0,
        });
        session.frame(200.0).unwrap();
        assert_eq!(session.state().respawns.len(), 1);

        session.reset().unwrap();
        assert!(session.state().respawns.is_empty());
        assert_eq!(session.state().power_ups.len(), 3);

        // A leftover entry from the previous generation must not fire either
        let stale = session.state.generation - 1;
        session.state.respawns.schedule(stale, 10.0);
        clear_board(&mut session);

        let mut events = Vec::new();
        for _ in 0..30 {
            events.extend(session.frame(100.0).unwrap());
        }
        assert!(session.state().power_ups.is_empty());
        assert!(session.state().respawns.is_empty());
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpRespawned(_)))
        );
    }

    #[test]
    fn test_no_space_pauses_session() {
        let tuning = Tuning {
            grid_size: 2,
            start_cell: (0, 0),
            initial_obstacles: 0,
            ..Default::default()
        };
        // 2x2 grid: snake, food, and two of the three power-ups fit; the
        // third has nowhere to go.
        let result = Session::new(1, tuning.clone(), Box::new(MemoryStore::new()));
        assert!(matches!(result, Err(SimError::NoSpaceAvailable)));

        let tuning = Tuning {
            grid_size: 3,
            start_cell: (0, 0),
            initial_obstacles: 0,
            obstacle_chance: 0.0,
            ..tuning
        };
        let mut session = Session::new(1, tuning, Box::new(MemoryStore::new())).unwrap();
        session.state.power_ups.clear();
        session.state.obstacles = (0..3)
            .flat_map(|y| (0..3).map(move |x| Cell::new(x, y)))
            .filter(|&c| c != Cell::new(0, 0) && c != Cell::new(1, 0))
            .collect();
        session.state.food = Cell::new(1, 0);

        let result = session.frame(200.0);
        assert_eq!(result, Err(SimError::NoSpaceAvailable));
        assert_eq!(session.phase(), GamePhase::Paused);
        // The move was not applied
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().snake.head(), Cell::new(0, 0));
        assert_eq!(session.state().food, Cell::new(1, 0));
        assert_eq!(session.state().time_ticks, 0);
    }

    #[test]
    fn test_new_rejects_invalid_tuning() {
        let cases = [
            Tuning {
                obstacle_chance: 1.5,
                ..Default::default()
            },
            Tuning {
                base_speed: 0,
                min_speed: 0,
                ..Default::default()
            },
            Tuning {
                grid_size: 0,
                ..Default::default()
            },
        ];
        for tuning in cases {
            let result = Session::new(1, tuning, Box::new(MemoryStore::new()));
            assert!(matches!(result, Err(SimError::InvalidTuning(_))));
        }
    }

    #[test]
    fn test_restore_rejects_invalid_save() {
        let mut source = session(4);
        source.state.tuning.obstacle_chance = 1.5;
        let bad_tuning = source.save_state().unwrap();

        let mut source = session(4);
        source.state.base_speed = 0;
        let bad_speed = source.save_state().unwrap();

        let mut target = session(9);
        let before = target.state().clone();
        for json in [bad_tuning, bad_speed] {
            let err = target.restore_state(&json).unwrap_err();
            assert!(matches!(err, RestoreError::Invalid(_)), "{}", err);
            assert_eq!(target.state(), &before);
        }
        assert!(matches!(
            target.restore_state("{ nope"),
            Err(RestoreError::Parse(_))
        ));
    }

    #[test]
    fn test_restore_saves_better_best_score() {
        let mut source = session(6);
        source.state.high_score = 50;
        let json = source.save_state().unwrap();

        let store = SharedStore::default();
        let mut target = Session::new(6, Tuning::default(), Box::new(store.clone())).unwrap();
        target.restore_state(&json).unwrap();
        assert_eq!(target.state().high_score, 50);
        assert_eq!(store.0.borrow().load_high_score(), 50);
        assert_eq!(store.0.borrow().saves, 1);

        // A worse save neither lowers nor rewrites the stored best
        let mut source = session(6);
        source.state.high_score = 10;
        let json = source.save_state().unwrap();
        target.restore_state(&json).unwrap();
        assert_eq!(target.state().high_score, 50);
        assert_eq!(store.0.borrow().saves, 1);
    }

    #[test]
    fn test_save_restore_replays_identically() {
        let mut original = session(2024);
        let script = [
            (Direction::Down, 300.0),
            (Direction::Right, 450.0),
            (Direction::Up, 170.0),
            (Direction::Left, 800.0),
        ];
        for &(dir, dt) in &script {
            original.turn(dir);
            let _ = original.frame(dt);
        }

        let json = original.save_state().unwrap();
        let mut restored = session(1);
        restored.restore_state(&json).unwrap();
        assert_eq!(restored.state(), original.state());

        for i in 0..40 {
            let (dir, dt) = script[i % script.len()];
            original.turn(dir);
            restored.turn(dir);
            assert_eq!(original.frame(dt), restored.frame(dt));
        }
        assert_eq!(restored.state(), original.state());
    }

    #[test]
    fn test_snapshot_json() {
        let session = session(5);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["snake"].as_array().unwrap().len(), 1);
        assert_eq!(json["power_ups"].as_array().unwrap().len(), 3);
        assert_eq!(json["paused"], false);
        assert_eq!(json["speed"], 6);
    }

    proptest! {
        #[test]
        fn turn_rejects_only_reversal(first in 0usize..4, second in 0usize..4) {
            let mut session = session(11);
            session.turn(Direction::ALL[first]);
            let current = session.state().snake.direction;
            let wanted = Direction::ALL[second];
            let accepted = session.turn(wanted);
            if wanted == current.opposite() {
                prop_assert!(!accepted);
                prop_assert_eq!(session.state().snake.direction, current);
            } else {
                prop_assert!(accepted);
                prop_assert_eq!(session.state().snake.direction, wanted);
            }
        }
    }
}
