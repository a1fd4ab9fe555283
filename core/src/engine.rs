use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::num::Saturating;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No reveal or flag yet, the clock is stopped
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Detonation,
    Timeout,
}

/// One game from first input to win or loss. Restarting means building a new session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    phase: Phase,
    revealed_safe_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    correct_flag_count: Saturating<CellCount>,
    score: u32,
    elapsed: Duration,
    time_limit: Duration,
    triggered_mine: Option<Coord2>,
    loss_cause: Option<LossCause>,
}

impl GameSession {
    /// Generates a fresh board for `config`, reproducible from `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let board = RandomMinefieldGenerator::new(seed).generate(&config)?;
        log::debug!(
            "New {}x{} game with {} mines, seed {seed}",
            config.size.0,
            config.size.1,
            board.mine_count()
        );
        Self::from_board(board, config.time_limit)
    }

    /// Like [`GameSession::new`] with a seed from the thread-local generator.
    #[cfg(feature = "std")]
    pub fn new_random(config: GameConfig) -> Result<Self> {
        use rand::Rng;

        let seed = rand::rng().random();
        log::info!("Using random seed {seed}");
        Self::new(config, seed)
    }

    pub fn from_board(board: Board, time_limit: Duration) -> Result<Self> {
        if time_limit.is_zero() {
            return Err(ConfigError::TimeLimit.into());
        }
        Ok(Self {
            board,
            phase: Phase::default(),
            revealed_safe_count: Saturating(0),
            flagged_count: Saturating(0),
            correct_flag_count: Saturating(0),
            score: 0,
            elapsed: Duration::ZERO,
            time_limit,
            triggered_mine: None,
            loss_cause: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.board.safe_cell_count()
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Flags that sit on mines. Reveals information, so meant for end-of-game summaries.
    pub fn correct_flag_count(&self) -> CellCount {
        self.correct_flag_count.0
    }

    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    /// Safe cells opened directly by the player, cascades excluded.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn remaining_time(&self) -> Duration {
        self.time_limit.saturating_sub(self.elapsed)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn loss_cause(&self) -> Option<LossCause> {
        self.loss_cause
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.view_of(coords))
    }

    /// Current view of every cell, row by row, for a full redraw.
    pub fn iter_views(&self) -> impl Iterator<Item = CellChange> + '_ {
        self.board.iter().map(|(coords, _)| CellChange {
            coords,
            view: self.view_of(coords),
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        use CellState::*;

        let coords = self.board.validate_coords(coords)?;
        if self.phase.is_finished() {
            return Ok(self.ignored_reveal(IgnoredReason::SessionFinished));
        }
        self.mark_started();

        match self.board[coords].state() {
            Flagged => return Ok(self.ignored_reveal(IgnoredReason::Flagged)),
            Revealed => return Ok(self.ignored_reveal(IgnoredReason::AlreadyRevealed)),
            Hidden => {}
        }

        let mut changed = Vec::new();
        if self.board.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.end_game(Phase::Lost, &mut changed);
            self.loss_cause = Some(LossCause::Detonation);
        } else {
            self.score += 1;
            self.reveal_safe_cell(coords, &mut changed);
            if self.board.adjacent_mine_count(coords) == 0 {
                self.cascade(coords, &mut changed);
            }

            if self.revealed_safe_count == Saturating(self.board.safe_cell_count()) {
                self.end_game(Phase::Won, &mut changed);
            }
        }

        Ok(RevealResult {
            phase: self.phase,
            ignored: None,
            changes: self.describe(&changed),
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        use CellState::*;

        let coords = self.board.validate_coords(coords)?;
        if self.phase.is_finished() {
            return Ok(self.ignored_flag(IgnoredReason::SessionFinished));
        }
        self.mark_started();

        let is_mine = self.board.contains_mine(coords);
        let next = match self.board[coords].state() {
            Hidden => {
                self.flagged_count += 1;
                if is_mine {
                    self.correct_flag_count += 1;
                }
                Flagged
            }
            Flagged => {
                self.flagged_count -= 1;
                if is_mine {
                    self.correct_flag_count -= 1;
                }
                Hidden
            }
            Revealed => return Ok(self.ignored_flag(IgnoredReason::AlreadyRevealed)),
        };
        self.board.set_state(coords, next);

        Ok(FlagResult {
            phase: self.phase,
            ignored: None,
            change: Some(CellChange {
                coords,
                view: self.view_of(coords),
            }),
        })
    }

    /// Advances the clock while a game is running and ends it once the time limit is hit.
    pub fn tick(&mut self, elapsed: Duration) -> TickResult {
        let mut changed = Vec::new();
        if self.phase == Phase::InProgress {
            self.elapsed = self.elapsed.saturating_add(elapsed);
            if self.elapsed >= self.time_limit {
                self.elapsed = self.time_limit;
                self.end_game(Phase::Lost, &mut changed);
                self.loss_cause = Some(LossCause::Timeout);
            }
        }

        TickResult {
            phase: self.phase,
            elapsed: self.elapsed,
            remaining: self.remaining_time(),
            changes: self.describe(&changed),
        }
    }

    fn reveal_safe_cell(&mut self, coords: Coord2, changed: &mut Vec<Coord2>) {
        debug_assert!(!self.board.contains_mine(coords));
        self.board.set_state(coords, CellState::Revealed);
        self.revealed_safe_count += 1;
        changed.push(coords);
    }

    /// Breadth-first flood from a zero cell. Only zero cells are expanded, so every
    /// neighbour visited is safe, and each cell is queued at most once because it is
    /// revealed before being queued.
    fn cascade(&mut self, origin: Coord2, changed: &mut Vec<Coord2>) {
        let before = self.revealed_safe_count;
        let mut to_visit = VecDeque::from([origin]);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.board.iter_neighbors(visit_coords) {
                if self.board[pos].state() != CellState::Hidden {
                    continue;
                }

                self.reveal_safe_cell(pos, changed);
                if self.board.adjacent_mine_count(pos) == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!(
            "Cascade from {origin:?} opened {} cells",
            (self.revealed_safe_count - before).0
        );
    }

    fn mark_started(&mut self) {
        if self.phase.is_ready() {
            log::debug!("Game started");
            self.phase = Phase::InProgress;
        }
    }

    /// Moves to a final phase and records the cells whose view the ending uncovers.
    fn end_game(&mut self, phase: Phase, changed: &mut Vec<Coord2>) {
        debug_assert!(phase.is_finished());
        if self.phase.is_finished() {
            return;
        }

        log::debug!("Game ended: {phase:?}");
        self.phase = phase;
        // unflagged mines and flags on safe cells, mines are never revealed
        changed.extend(
            self.board
                .iter()
                .filter(|(_, cell)| cell.is_mine() != (cell.state() == CellState::Flagged))
                .map(|(coords, _)| coords),
        );
    }

    fn view_of(&self, coords: Coord2) -> CellView {
        let cell = self.board[coords];
        let finished = self.phase.is_finished();

        match cell.state() {
            CellState::Revealed => CellView::revealed(cell.adjacent_mines()),
            CellState::Flagged if finished && !cell.is_mine() => CellView::IncorrectlyFlaggedShown,
            CellState::Flagged => CellView::Flagged,
            CellState::Hidden if finished && cell.is_mine() => {
                if self.triggered_mine == Some(coords) {
                    CellView::ExplodedMine
                } else {
                    CellView::UnflaggedMineShown
                }
            }
            CellState::Hidden => CellView::HiddenDefault,
        }
    }

    fn describe(&self, changed: &[Coord2]) -> Vec<CellChange> {
        changed
            .iter()
            .map(|&coords| CellChange {
                coords,
                view: self.view_of(coords),
            })
            .collect()
    }

    fn ignored_reveal(&self, reason: IgnoredReason) -> RevealResult {
        log::trace!("Reveal ignored: {reason:?}");
        RevealResult {
            phase: self.phase,
            ignored: Some(reason),
            changes: Vec::new(),
        }
    }

    fn ignored_flag(&self, reason: IgnoredReason) -> FlagResult {
        log::trace!("Flag ignored: {reason:?}");
        FlagResult {
            phase: self.phase,
            ignored: Some(reason),
            change: None,
        }
    }
}
