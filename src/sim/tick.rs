//! Fixed-step simulation tick
//!
//! One call moves the snake one cell and resolves everything that follows
//! from it: collisions, eating, spawning and power-up pickup.

use super::collision::{Collision, check_collision};
use super::grid::{Cell, step};
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};
use crate::error::SimError;

/// Advance the game by one tick, appending notifications to `events`.
///
/// Does nothing unless the game is `Playing`. On error the state is left
/// exactly as it was before the call.
pub fn tick(state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    let n = state.tuning.grid_size;
    let next = step(state.snake.head(), state.snake.direction, n);
    let collision = check_collision(next, &state.snake, &state.obstacles);

    if let Some(collision) = collision.filter(|_| state.shield_charges == 0) {
        state.time_ticks += 1;
        events.push(hit_event(collision, next));
        end_game(state, events);
        return Ok(());
    }

    // Drawn before any mutation so a full board fails cleanly. The eaten
    // cell is already excluded, so the free set matches the post-move board.
    let new_food = if next == state.food {
        Some(state.random_empty_cell()?)
    } else {
        None
    };

    state.time_ticks += 1;

    // Shield absorbs the hit
    if let Some(collision) = collision {
        state.shield_charges -= 1;
        if collision == Collision::Obstacle {
            state.obstacles.retain(|&o| o != next);
        }
        events.push(hit_event(collision, next));
        log::debug!(
            "Shield absorbed {:?} at {:?}, {} left",
            collision,
            next,
            state.shield_charges
        );
    }

    state.snake.body.push_front(next);

    // Eat food or move on
    if let Some(food) = new_food {
        state.score += state.tuning.food_score;
        events.push(GameEvent::AteFood { score: state.score });
        state.food = food;

        let chance = state.tuning.obstacle_chance;
        if state.roll(chance) {
            match state.random_empty_cell() {
                Ok(cell) => {
                    state.obstacles.push(cell);
                    events.push(GameEvent::ObstacleSpawned { cell });
                }
                Err(err) => log::warn!("Skipped obstacle spawn: {}", err),
            }
        }
    } else {
        state.snake.body.pop_back();
    }

    // Power-ups
    if let Some(idx) = state.power_ups.iter().position(|p| p.pos == next) {
        let power_up = state.power_ups.remove(idx);
        apply_power_up(state, power_up.kind);
        events.push(GameEvent::Collected(power_up.kind));

        let generation = state.generation;
        let delay = state.tuning.power_up_respawn_delay_ms;
        state.respawns.schedule(generation, delay);
    }

    Ok(())
}

fn hit_event(collision: Collision, cell: Cell) -> GameEvent {
    match collision {
        Collision::Obstacle => GameEvent::HitObstacle { cell },
        Collision::SelfHit => GameEvent::HitSelf { cell },
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Boost => {
            state.boost_remaining_ms = state.tuning.boost_duration_ms;
        }
        PowerUpKind::Shield => {
            state.shield_charges += 1;
        }
        PowerUpKind::Bonus => {
            state.score += state.tuning.bonus_score;
            state.base_speed = state
                .base_speed
                .saturating_sub(1)
                .max(state.tuning.min_speed);
        }
    }
    log::debug!("Collected {}", kind.as_str());
}

fn end_game(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::GameOver;
    events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over with score {} after {} ticks", state.score, state.time_ticks);

    if state.score > state.high_score {
        state.high_score = state.score;
        events.push(GameEvent::NewHighScore(state.score));
    }
}
