//! Deferred power-up respawns
//!
//! A collected power-up is replaced after a delay. The replacement is a
//! queued entry tagged with the generation it was scheduled in, counted down
//! by the timing controller. Entries from an older generation never fire.

use serde::{Deserialize, Serialize};

/// One pending respawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRespawn {
    /// Generation the respawn belongs to
    pub generation: u32,
    /// Milliseconds of game time until it fires
    pub due_in_ms: f64,
}

/// Scheduled respawns, in scheduling order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub fn schedule(&mut self, generation: u32, delay_ms: f64) {
        self.pending.push(PendingRespawn {
            generation,
            due_in_ms: delay_ms,
        });
    }

    /// Cancel everything (used by reset)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance all timers by `dt_ms` and return how many respawns are due
    /// for `generation`. Due and stale entries are removed.
    pub fn advance(&mut self, dt_ms: f64, generation: u32) -> usize {
        let mut due = 0;
        self.pending.retain_mut(|p| {
            if p.generation != generation {
                log::debug!("Dropping stale respawn from generation {}", p.generation);
                return false;
            }
            p.due_in_ms -= dt_ms;
            if p.due_in_ms <= 0.0 {
                due += 1;
                false
            } else {
                true
            }
        });
        due
    }
}
