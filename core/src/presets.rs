use core::fmt;
use core::str::FromStr;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board size and time limit bundles offered to the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small board, very little time.
    #[default]
    Easy,
    Medium,
    /// Large board, most time.
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn size(self) -> Coord2 {
        match self {
            Self::Easy => (6, 6),
            Self::Medium => (15, 15),
            Self::Hard => (20, 20),
        }
    }

    pub const fn time_limit(self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(3),
            Self::Medium => Duration::from_secs(4 * 60),
            Self::Hard => Duration::from_secs(5 * 60),
        }
    }

    pub const fn config(self) -> GameConfig {
        GameConfig::new(self.size(), DEFAULT_MINE_PROBABILITY, self.time_limit())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty, expected one of: easy, medium, hard")]
pub struct UnknownDifficulty;

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownDifficulty)
    }
}
