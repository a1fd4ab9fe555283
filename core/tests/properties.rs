use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use minefield_core::*;

const SEEDS: std::ops::Range<u64> = 0..40;

fn configs() -> impl Iterator<Item = GameConfig> {
    [
        GameConfig::new((1, 1), 0.5, Duration::from_secs(5)),
        GameConfig::new((1, 9), 0.3, Duration::from_secs(5)),
        GameConfig::new((9, 1), 0.3, Duration::from_secs(5)),
        GameConfig::new((8, 8), 0.1, Duration::from_secs(5)),
        GameConfig::new((16, 12), 0.15, Duration::from_secs(5)),
        GameConfig::new((30, 16), 0.2, Duration::from_secs(5)),
    ]
    .into_iter()
}

fn sessions() -> impl Iterator<Item = GameSession> {
    configs().flat_map(|config| SEEDS.map(move |seed| GameSession::new(config, seed).unwrap()))
}

fn in_grid_neighbors((x, y): Coord2, (width, height): Coord2) -> Vec<Coord2> {
    let mut out = Vec::new();
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if (dx, dy) != (0, 0) && nx >= 0 && ny >= 0 && nx < width as i32 && ny < height as i32
            {
                out.push((nx as Coord, ny as Coord));
            }
        }
    }
    out
}

/// Zero cells connected to `start` through zero cells, plus their neighbours.
fn expected_cascade(board: &Board, start: Coord2) -> BTreeSet<Coord2> {
    let mut zeros = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(coords) = queue.pop_front() {
        for pos in in_grid_neighbors(coords, board.size()) {
            if board.adjacent_mine_count(pos) == 0 && !board.contains_mine(pos) && zeros.insert(pos)
            {
                queue.push_back(pos);
            }
        }
    }

    let mut opened = zeros.clone();
    for &coords in &zeros {
        opened.extend(in_grid_neighbors(coords, board.size()));
    }
    opened
}

#[test]
fn adjacency_matches_brute_force() {
    for game in sessions() {
        let board = game.board();
        let mut mines = 0;
        for (coords, cell) in board.iter() {
            let expected = in_grid_neighbors(coords, board.size())
                .into_iter()
                .filter(|&pos| board.contains_mine(pos))
                .count();
            assert_eq!(cell.adjacent_mines() as usize, expected, "at {coords:?}");
            mines += cell.is_mine() as CellCount;
        }
        assert_eq!(mines, board.mine_count());
        assert!(board.mine_count() < board.total_cells());
    }
}

#[test]
fn revealing_a_mine_always_loses() {
    for mut game in sessions() {
        let Some(mine) = game
            .board()
            .iter()
            .find(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
        else {
            continue;
        };

        // also from an in-progress game, when opening a numbered cell does not already win
        let numbered = game
            .board()
            .iter()
            .find(|(_, cell)| !cell.is_mine() && cell.adjacent_mines() > 0)
            .map(|(coords, _)| coords)
            .filter(|_| game.safe_cell_count() > 1);
        if let Some(coords) = numbered {
            assert_eq!(game.reveal(coords).unwrap().phase, Phase::InProgress);
        }

        let result = game.reveal(mine).unwrap();
        assert_eq!(result.phase, Phase::Lost);
        assert_eq!(game.view_at(mine).unwrap(), CellView::ExplodedMine);
    }
}

#[test]
fn cascade_opens_zero_component_and_border_only() {
    for mut game in sessions() {
        let Some(start) = game
            .board()
            .iter()
            .find(|(_, cell)| !cell.is_mine() && cell.adjacent_mines() == 0)
            .map(|(coords, _)| coords)
        else {
            continue;
        };
        let expected = expected_cascade(game.board(), start);

        let result = game.reveal(start).unwrap();

        let opened: BTreeSet<Coord2> = game
            .board()
            .iter()
            .filter(|(_, cell)| cell.state() == CellState::Revealed)
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(opened, expected);
        assert!(opened.iter().all(|&coords| !game.board().contains_mine(coords)));
        assert_eq!(game.revealed_safe_count() as usize, opened.len());
        assert_eq!(game.score(), 1);

        let revealed_changes = result
            .changes
            .iter()
            .filter(|change| !matches!(change.view, CellView::UnflaggedMineShown))
            .count();
        assert_eq!(revealed_changes, opened.len());
    }
}

#[test]
fn revealed_count_tracks_each_new_cell_once() {
    for mut game in sessions() {
        let safe: Vec<Coord2> = game
            .board()
            .iter()
            .filter(|(_, cell)| !cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();

        let mut seen = BTreeSet::new();
        for &coords in &safe {
            let before = game.revealed_safe_count();
            let result = game.reveal(coords).unwrap();
            let fresh = result
                .changes
                .iter()
                .filter(|change| !change.view.is_closed())
                .filter(|change| !game.board().contains_mine(change.coords))
                .filter(|change| seen.insert(change.coords))
                .count();
            assert_eq!(game.revealed_safe_count() - before, fresh as CellCount);
            if game.is_finished() {
                break;
            }
        }

        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.revealed_safe_count(), game.safe_cell_count());
    }
}

#[test]
fn flag_toggle_twice_restores_every_cell() {
    for mut game in sessions().take(60) {
        let coords: Vec<Coord2> = game.board().iter().map(|(coords, _)| coords).collect();
        for coords in coords {
            let before = game.cell_at(coords).unwrap();
            game.toggle_flag(coords).unwrap();
            game.toggle_flag(coords).unwrap();
            assert_eq!(game.cell_at(coords).unwrap(), before);
            assert_eq!(game.flagged_count(), 0);
        }
    }
}

#[test]
fn single_cell_board_is_always_winnable() {
    for seed in SEEDS {
        let config = GameConfig::new((1, 1), 0.95, Duration::from_secs(5));
        let mut game = GameSession::new(config, seed).unwrap();

        assert_eq!(game.mine_count(), 0);
        assert_eq!(game.reveal((0, 0)).unwrap().phase, Phase::Won);
    }
}
