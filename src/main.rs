//! Snake Rush entry point
//!
//! Native builds run a headless autopilot game at a fixed 60 Hz frame rate
//! and print the final board. The browser build is driven through `web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use snake_rush::consts::HIGH_SCORE_FILE;
    use snake_rush::highscores::FileStore;
    use snake_rush::sim::{Cell, Direction, GamePhase, GameState, Snapshot, check_collision, step};
    use snake_rush::{LogSink, Renderer, Session, Tuning};

    /// Frame length of a 60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of frames
    const MAX_FRAMES: u32 = 60 * 120;

    /// Prints the board as text
    struct TextRenderer;

    impl Renderer for TextRenderer {
        fn draw(&mut self, snapshot: &Snapshot<'_>) {
            let n = snapshot.grid_size;
            for y in 0..n {
                let row: String = (0..n)
                    .map(|x| {
                        let c = Cell::new(x, y);
                        if snapshot.snake.front() == Some(&c) {
                            '@'
                        } else if snapshot.snake.contains(&c) {
                            'o'
                        } else if snapshot.food == c {
                            '*'
                        } else if snapshot.obstacles.contains(&c) {
                            '#'
                        } else if let Some(p) = snapshot.power_ups.iter().find(|p| p.pos == c) {
                            p.kind.as_str().chars().next().unwrap_or('?')
                        } else {
                            '.'
                        }
                    })
                    .collect();
                println!("{}", row);
            }
            println!(
                "score {}  best {}  speed {}  shields {}{}",
                snapshot.score,
                snapshot.high_score,
                snapshot.speed,
                snapshot.shield_charges,
                if snapshot.game_over { "  GAME OVER" } else { "" }
            );
        }
    }

    /// Wrapped Manhattan distance
    fn torus_distance(a: Cell, b: Cell, n: i32) -> i32 {
        let d = (a - b).abs();
        d.x.min(n - d.x) + d.y.min(n - d.y)
    }

    /// Greedy heading: safe moves first, then closest to food
    fn choose_direction(state: &GameState) -> Direction {
        let n = state.tuning.grid_size;
        let head = state.snake.head();
        let current = state.snake.direction;
        Direction::ALL
            .into_iter()
            .filter(|&d| d != current.opposite())
            .min_by_key(|&d| {
                let next = step(head, d, n);
                let unsafe_move = check_collision(next, &state.snake, &state.obstacles).is_some();
                (unsafe_move, torus_distance(next, state.food, n))
            })
            .unwrap_or(current)
    }

    pub fn run() {
        env_logger::init();
        log::info!("Snake Rush (native) starting...");

        let tuning = match std::env::args().nth(1) {
            Some(path) => match Tuning::load(&path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("{}", e);
                    std::process::exit(1);
                }
            },
            None => Tuning::default(),
        };

        let seed: u64 = rand::random();
        let store = Box::new(FileStore::new(HIGH_SCORE_FILE));
        let mut session = match Session::new(seed, tuning, store) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not start a game: {}", e);
                std::process::exit(1);
            }
        };
        session.add_sink(Box::new(LogSink));

        for _ in 0..MAX_FRAMES {
            let dir = choose_direction(session.state());
            session.turn(dir);
            if let Err(e) = session.frame(FRAME_MS) {
                log::warn!("Stopping: {}", e);
                break;
            }
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        session.render(&mut TextRenderer);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
