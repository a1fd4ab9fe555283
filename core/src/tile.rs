use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Player-visible state of a cell, the only part of a cell that changes during play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// One grid position. Mine status and adjacency are fixed when the board is built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    adjacent_mines: u8,
    state: CellState,
}

impl Cell {
    pub(crate) const fn new(is_mine: bool, adjacent_mines: u8) -> Self {
        Self {
            is_mine,
            adjacent_mines,
            state: CellState::Hidden,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        debug_assert!(
            self.state != CellState::Revealed,
            "revealed cells are final"
        );
        self.state = state;
    }
}

/// Image category a renderer should use for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    HiddenDefault,
    RevealedBlank,
    /// Always in `1..=8`.
    RevealedNumber(u8),
    Flagged,
    ExplodedMine,
    UnflaggedMineShown,
    IncorrectlyFlaggedShown,
}

impl CellView {
    /// Category of a revealed safe cell with `adjacent_mines` neighbouring mines.
    pub const fn revealed(adjacent_mines: u8) -> Self {
        match adjacent_mines {
            0 => Self::RevealedBlank,
            count => Self::RevealedNumber(count),
        }
    }

    /// Whether the cell is drawn as still closed.
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            HiddenDefault => true,
            RevealedBlank => false,
            RevealedNumber(_) => false,
            Flagged => true,
            ExplodedMine => false,
            UnflaggedMineShown => false,
            IncorrectlyFlaggedShown => true,
        }
    }
}

/// A cell whose category changed during one engine call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub view: CellView,
}
