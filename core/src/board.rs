use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed rectangular grid of cells with the mine layout and adjacency counts baked in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds a board from a row-major mine mask, precomputing every adjacency count.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let (Ok(width), Ok(height)) = (Coord::try_from(cols), Coord::try_from(rows)) else {
            return Err(ConfigError::BoardShape.into());
        };

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        if mine_count >= mine_mask.len() {
            return Err(ConfigError::AllMines.into());
        }

        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            let coords = (col as Coord, row as Coord);
            let adjacent = NeighborIter::new(coords, (width, height))
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            Cell::new(mine_mask[(row, col)], adjacent as u8)
        });

        Ok(Self {
            cells,
            // bounded by width * height, which fits `CellCount`
            mine_count: mine_count as CellCount,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let mut mine_mask: Array2<bool> = Array2::default(nd_shape(size));

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// `(width, height)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self[coords].adjacent_mines()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((col as Coord, row as Coord), cell))
    }

    pub(crate) fn set_state(&mut self, coords: Coord2, state: CellState) {
        self.cells[coords.to_nd_index()].set_state(state);
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn adjacency_counts_on_small_board() {
        // . * .
        // . . .
        // * . .
        let board = Board::from_mine_coords((3, 3), &[(1, 0), (0, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.safe_cell_count(), 7);
        assert_eq!(board.adjacent_mine_count((0, 0)), 1);
        assert_eq!(board.adjacent_mine_count((0, 1)), 2);
        assert_eq!(board.adjacent_mine_count((1, 1)), 2);
        assert_eq!(board.adjacent_mine_count((2, 2)), 0);
        assert_eq!(board.adjacent_mine_count((2, 0)), 1);
    }

    #[test]
    fn non_square_board_uses_width_for_x() {
        let board = Board::from_mine_coords((4, 2), &[(3, 1)]).unwrap();

        assert_eq!(board.size(), (4, 2));
        assert!(board.contains_mine((3, 1)));
        assert_eq!(board.adjacent_mine_count((2, 0)), 1);
        assert_eq!(board.adjacent_mine_count((1, 0)), 0);
        assert_eq!(board.validate_coords((3, 2)), Err(GameError::OutOfBounds));
        assert_eq!(board.validate_coords((4, 0)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn rejects_all_mines() {
        assert_eq!(
            Board::from_mine_coords((1, 1), &[(0, 0)]),
            Err(GameError::InvalidConfiguration(ConfigError::AllMines))
        );
    }

    #[test]
    fn rejects_empty_board() {
        assert_eq!(
            Board::from_mine_coords((0, 3), &[]),
            Err(GameError::InvalidConfiguration(ConfigError::EmptyBoard))
        );
    }

    #[test]
    fn rejects_mines_outside_board() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn rejects_oversized_mask() {
        let mask = Array2::default((1, 300));
        assert_eq!(
            Board::from_mine_mask(mask),
            Err(GameError::InvalidConfiguration(ConfigError::BoardShape))
        );
    }

    #[test]
    fn iter_is_row_major() {
        let board = Board::from_mine_coords((2, 2), &[]).unwrap();
        let coords: Vec<_> = board.iter().map(|(coords, _)| coords).collect();
        assert_eq!(coords, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
