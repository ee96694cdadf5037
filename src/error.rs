//! Error types for the simulation core and configuration

use thiserror::Error;

/// Errors raised while advancing or (re)building the game
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Every grid cell is taken by the snake, food, obstacles or power-ups.
    #[error("no unoccupied grid cell is available")]
    NoSpaceAvailable,
    /// Tuning values the simulation cannot run with
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
    /// A restored state that breaks a simulation invariant
    #[error("invalid game state: {0}")]
    InvalidState(&'static str),
}

/// Errors raised while restoring a saved session
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("failed to parse saved session: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("saved session is unusable: {0}")]
    Invalid(#[from] SimError),
}

/// Errors raised while loading or validating a [`crate::Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}
