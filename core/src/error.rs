use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Invalid game configuration: {0}")]
    InvalidConfiguration(ConfigError),
}

/// Which part of a configuration was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board width and height must be positive")]
    EmptyBoard,
    #[error("mine probability must be strictly between 0 and 1")]
    MineProbability,
    #[error("time limit must be positive")]
    TimeLimit,
    #[error("every cell would be a mine")]
    AllMines,
    #[error("board shape does not match declared size")]
    BoardShape,
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
