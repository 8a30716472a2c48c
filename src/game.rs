use std::collections::VecDeque;

use log::debug;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::{Board, CellStatus, Difficulty, GameError, Position};

pub const MIN_SIDE: u32 = 5;
pub const MAX_SIDE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
}

/// Discrete outcome events, queued by each command and drained by the
/// presentation layer with [`Game::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TileRevealed { pos: Position },
    FloodTilesRevealed { tiles: Vec<Position> },
    FlagToggled { pos: Position },
    GameWon,
    GameLost,
}

/// The game-state engine: turn legality, deferred first-move mine placement,
/// reveal/flood/chord, win/loss detection and event emission.
///
/// `Won` and `Lost` are terminal; a new `Game` is required to play again.
pub struct Game {
    pub(crate) rows: u32,
    pub(crate) cols: u32,
    pub(crate) difficulty: Difficulty,
    pub(crate) board: Board,
    pub(crate) is_first_move: bool,
    pub(crate) status: GameStatus,
    pub(crate) tiles_to_reveal: u32,
    rng: StdRng,
    events: VecDeque<GameEvent>,
}

impl Game {
    pub fn new(rows: u32, cols: u32, difficulty: Difficulty) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, difficulty, StdRng::from_entropy())
    }

    /// Deterministic construction: the seed drives both the density sample
    /// and the mine-placement shuffle.
    pub fn with_seed(
        rows: u32,
        cols: u32,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        rows: u32,
        cols: u32,
        difficulty: Difficulty,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        let side_ok = |n: u32| (MIN_SIDE..=MAX_SIDE).contains(&n);
        if !side_ok(rows) || !side_ok(cols) {
            return Err(GameError::InvalidDimensions { rows, cols });
        }

        let mine_count = difficulty.mine_count(rows, cols, &mut rng);
        Ok(Self {
            rows,
            cols,
            difficulty,
            board: Board::new(rows, cols, mine_count),
            is_first_move: true,
            status: GameStatus::Playing,
            tiles_to_reveal: rows * cols - mine_count,
            rng,
            events: VecDeque::new(),
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Non-mine cells still to reveal; reaching 0 wins the game.
    pub fn tiles_to_reveal(&self) -> u32 {
        self.tiles_to_reveal
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, pos: Position) -> Result<&crate::Cell, GameError> {
        self.board.cell(pos)
    }

    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        self.board.neighbors(pos)
    }

    /// Drains every event queued since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn perform_action(&mut self, pos: Position, action: Action) -> Result<(), GameError> {
        match action {
            Action::Reveal => self.reveal(pos),
            Action::Flag => self.toggle_flag(pos),
        }
    }

    /// Reveals the cell at `pos`. On the first move this first deploys mines
    /// excluding `pos`, so the first click is always safe. Flagged cells are
    /// protected (no-op); a mine loses the game; a revealed numbered cell is
    /// treated as a chord request; a zero-adjacency cell flood-reveals its
    /// whole region.
    pub fn reveal(&mut self, pos: Position) -> Result<(), GameError> {
        self.assert_playing()?;
        self.ensure_mines_deployed(pos)?;

        let cell = *self.board.cell(pos)?;

        if cell.is_flagged() {
            return Ok(());
        }
        if cell.is_mine() {
            self.trigger_mine();
            return Ok(());
        }
        if cell.is_revealed() {
            if cell.adjacent_mines() != 0 {
                self.chord_reveal(pos)?;
            }
            return Ok(());
        }

        if cell.adjacent_mines() == 0 {
            self.flood_reveal(pos)?;
        } else {
            self.reveal_single(pos)?;
        }
        Ok(())
    }

    /// Flags or unflags the cell at `pos`; revealed cells are ignored.
    pub fn toggle_flag(&mut self, pos: Position) -> Result<(), GameError> {
        self.assert_playing()?;

        if self.board.cell(pos)?.is_revealed() {
            return Ok(());
        }
        self.board.toggle_flag(pos)?;
        self.events.push_back(GameEvent::FlagToggled { pos });
        Ok(())
    }

    fn assert_playing(&self) -> Result<(), GameError> {
        if self.status == GameStatus::Playing {
            Ok(())
        } else {
            Err(GameError::NotPlaying)
        }
    }

    fn ensure_mines_deployed(&mut self, pos: Position) -> Result<(), GameError> {
        if self.is_first_move {
            // Validate before deploying so a bad first coordinate leaves the
            // board untouched.
            if !self.board.contains(pos) {
                return Err(GameError::OutOfBounds(pos));
            }
            self.board.deploy_mines(pos, &mut self.rng)?;
            self.is_first_move = false;
            debug!("first move at {:?}; mines deployed", pos);
        }
        Ok(())
    }

    fn reveal_single(&mut self, pos: Position) -> Result<(), GameError> {
        if !self.board.cell_mut(pos)?.reveal() {
            return Err(GameError::ExpectedHidden(pos));
        }
        self.handle_successful_reveal(pos);
        Ok(())
    }

    fn handle_successful_reveal(&mut self, pos: Position) {
        self.tiles_to_reveal -= 1;
        self.events.push_back(GameEvent::TileRevealed { pos });
        if self.tiles_to_reveal == 0 {
            self.finish_won();
        }
    }

    /// Re-reveal of a numbered cell: if exactly `adjacent_mines` neighbors
    /// are flagged, reveals every hidden neighbor; otherwise does nothing.
    /// The cascade stops as soon as a neighbor ends the game.
    fn chord_reveal(&mut self, pos: Position) -> Result<(), GameError> {
        let cell = *self.board.cell(pos)?;
        if !cell.is_revealed() || cell.adjacent_mines() == 0 {
            return Ok(());
        }

        let neighbors = self.board.neighbors(pos);
        let flagged = neighbors
            .iter()
            .filter(|&&p| self.board.cell(p).map_or(false, |c| c.is_flagged()))
            .count() as u8;
        if flagged != cell.adjacent_mines() {
            return Ok(());
        }

        for &neighbor in &neighbors {
            if self.status != GameStatus::Playing {
                break;
            }
            if self.board.cell(neighbor)?.status() == CellStatus::Hidden {
                self.reveal(neighbor)?;
            }
        }
        Ok(())
    }

    /// Iterative depth-first flood from a zero-adjacency cell. Neighbors are
    /// pushed unconditionally; the pop-time visited/status checks are
    /// authoritative. Emits one batched event for the whole region.
    fn flood_reveal(&mut self, pos: Position) -> Result<(), GameError> {
        let mut stack = vec![pos];
        let mut visited: Array2<bool> =
            Array2::from_elem((self.rows as usize, self.cols as usize), false);
        let mut revealed = Vec::new();

        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;

            let cell = *self.board.cell(current)?;
            if cell.status() != CellStatus::Hidden || cell.is_mine() {
                continue;
            }
            if !self.board.cell_mut(current)?.reveal() {
                return Err(GameError::ExpectedHidden(current));
            }
            revealed.push(current);

            if cell.adjacent_mines() == 0 {
                stack.extend(self.board.neighbors(current));
            }
        }

        self.handle_successful_flood(revealed);
        Ok(())
    }

    fn handle_successful_flood(&mut self, revealed: Vec<Position>) {
        self.tiles_to_reveal -= revealed.len() as u32;
        self.events
            .push_back(GameEvent::FloodTilesRevealed { tiles: revealed });
        if self.tiles_to_reveal == 0 {
            self.finish_won();
        }
    }

    fn finish_won(&mut self) {
        self.status = GameStatus::Won;
        self.board.flag_remaining_mines();
        self.events.push_back(GameEvent::GameWon);
    }

    fn trigger_mine(&mut self) {
        self.status = GameStatus::Lost;
        self.board.reveal_mines();
        self.board.reveal_incorrect_flags();
        self.events.push_back(GameEvent::GameLost);
    }
}
