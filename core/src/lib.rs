#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use presets::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod presets;
mod tile;
mod types;

/// Per-cell mine probability used by every preset.
pub const DEFAULT_MINE_PROBABILITY: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(width, height)`
    pub size: Coord2,
    /// Chance for each cell, independently, to hold a mine.
    pub mine_probability: f64,
    pub time_limit: Duration,
}

impl GameConfig {
    pub const fn new(size: Coord2, mine_probability: f64, time_limit: Duration) -> Self {
        Self {
            size,
            mine_probability,
            time_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        // also rejects NaN
        if !(self.mine_probability > 0.0 && self.mine_probability < 1.0) {
            return Err(ConfigError::MineProbability.into());
        }
        if self.time_limit.is_zero() {
            return Err(ConfigError::TimeLimit.into());
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Why an input was accepted without changing anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoredReason {
    /// Flagged cells are protected from reveal.
    Flagged,
    AlreadyRevealed,
    /// The game is over, no new moves are accepted.
    SessionFinished,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealResult {
    pub phase: Phase,
    pub ignored: Option<IgnoredReason>,
    /// Every cell whose view changed, in the order it changed.
    pub changes: Vec<CellChange>,
}

impl RevealResult {
    pub fn has_update(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagResult {
    pub phase: Phase,
    pub ignored: Option<IgnoredReason>,
    pub change: Option<CellChange>,
}

impl FlagResult {
    pub fn has_update(&self) -> bool {
        self.change.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub phase: Phase,
    pub elapsed: Duration,
    pub remaining: Duration,
    /// Mines and wrong flags uncovered when the clock ran out, empty otherwise.
    pub changes: Vec<CellChange>,
}
