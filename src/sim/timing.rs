//! Frame-to-tick conversion
//!
//! The host reports wall-clock time once per rendered frame; the clock turns
//! it into zero or more fixed ticks at the current speed and decays the
//! wall-clock timers (boost, power-up lifetimes, pending respawns).

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use super::tick::tick;
use crate::consts::{MAX_TICKS_PER_FRAME, MS_PER_SECOND};
use crate::error::SimError;

/// Fixed-step accumulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Milliseconds carried over to the next frame, always below one interval
    accumulator_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Drop any carried-over time (used on reset and restore)
    pub fn clear(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Feed `dt_ms` of wall-clock time into the simulation.
    ///
    /// Returns the number of ticks run. Nothing happens unless the game is
    /// `Playing`. At most [`MAX_TICKS_PER_FRAME`] ticks run per call; any
    /// further backlog is discarded.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        dt_ms: f64,
        events: &mut Vec<GameEvent>,
    ) -> Result<u32, SimError> {
        if state.phase != GamePhase::Playing {
            return Ok(0);
        }
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        // Work in tick-scaled units (ms * ticks/s) so one tick costs exactly
        // MS_PER_SECOND and whole-second frames divide without rounding.
        let speed = f64::from(state.current_speed());
        let mut budget = (self.accumulator_ms + dt_ms) * speed;
        let mut ticks = 0;

        while budget >= MS_PER_SECOND {
            if ticks == MAX_TICKS_PER_FRAME {
                let dropped = (budget / MS_PER_SECOND).floor();
                log::debug!("Tick cap reached, dropping {} ticks of backlog", dropped);
                budget %= MS_PER_SECOND;
                break;
            }
            budget -= MS_PER_SECOND;
            ticks += 1;
            if let Err(err) = tick(state, events) {
                // The failed tick did not happen; keep its time owed
                self.accumulator_ms = (budget + MS_PER_SECOND) / speed;
                return Err(err);
            }
            if state.phase == GamePhase::GameOver {
                budget = 0.0;
                break;
            }
        }
        self.accumulator_ms = budget / speed;

        if state.phase == GamePhase::Playing {
            decay_timers(state, dt_ms, events);
        }
        Ok(ticks)
    }
}

/// Wall-clock bookkeeping, not quantized to ticks
fn decay_timers(state: &mut GameState, dt_ms: f64, events: &mut Vec<GameEvent>) {
    state.boost_remaining_ms = (state.boost_remaining_ms - dt_ms).max(0.0);

    state.power_ups.retain_mut(|p| {
        p.remaining_ms -= dt_ms;
        if p.remaining_ms > 0.0 {
            true
        } else {
            events.push(GameEvent::PowerUpExpired(p.kind));
            false
        }
    });

    let generation = state.generation;
    let due = state.respawns.advance(dt_ms, generation);
    for _ in 0..due {
        let kind = state.random_power_up_kind();
        match state.spawn_power_up(kind) {
            Ok(()) => events.push(GameEvent::PowerUpRespawned(kind)),
            Err(err) => log::warn!("Dropping {} respawn: {}", kind.as_str(), err),
        }
    }
}
