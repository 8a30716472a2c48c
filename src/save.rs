use log::debug;
use serde::{Deserialize, Serialize};

use crate::{CellStatus, Difficulty, Game, GameError, GameStatus, Position};

/// Per-cell entry of the persisted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub status: CellStatus,
    pub is_mine: bool,
    pub adjacent_mine_count: u8,
}

/// The full persisted game state. The JSON field names and status strings
/// are part of the save format and must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub rows: u32,
    pub cols: u32,
    pub difficulty: Difficulty,
    pub board: Vec<Vec<CellSnapshot>>,
    /// Milliseconds; owned by the presentation layer's timer.
    pub elapsed_time: u64,
    pub status: GameStatus,
    pub tiles_to_reveal: u32,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Game {
    /// Exports the complete game state. `elapsed_time` is carried through
    /// untouched for the caller's timer.
    pub fn snapshot(&self, elapsed_time: u64) -> GameSnapshot {
        let board = (0..self.rows as i32)
            .map(|row| {
                (0..self.cols as i32)
                    .map(|col| {
                        // In-bounds by construction.
                        let cell = &self.board[Position::new(row, col)];
                        CellSnapshot {
                            status: cell.status(),
                            is_mine: cell.is_mine(),
                            adjacent_mine_count: cell.adjacent_mines(),
                        }
                    })
                    .collect()
            })
            .collect();

        GameSnapshot {
            rows: self.rows,
            cols: self.cols,
            difficulty: self.difficulty,
            board,
            elapsed_time,
            status: self.status,
            tiles_to_reveal: self.tiles_to_reveal,
        }
    }

    /// Rebuilds a game from a snapshot: constructs a fresh game with the
    /// saved dimensions and difficulty, replays the per-cell fields, and
    /// recomputes the flag/mine counters from the replayed grid.
    ///
    /// A snapshot without mines (pristine, or flagged before the first
    /// reveal) restores to a pre-first-move game: the replayed flags and
    /// their count are kept, the freshly sampled mine count stands, and the
    /// next reveal deploys mines as usual. Otherwise the saved
    /// `tiles_to_reveal` is taken verbatim.
    pub fn restore(snapshot: &GameSnapshot) -> Result<Game, GameError> {
        let mut game = Game::new(snapshot.rows, snapshot.cols, snapshot.difficulty)?;

        let shape_err = || GameError::InvalidBoardShape {
            rows: snapshot.rows,
            cols: snapshot.cols,
        };
        if snapshot.board.len() != snapshot.rows as usize {
            return Err(shape_err());
        }

        let mut flag_count = 0;
        let mut mine_count = 0;

        for (row, cells) in snapshot.board.iter().enumerate() {
            if cells.len() != snapshot.cols as usize {
                return Err(shape_err());
            }
            for (col, saved) in cells.iter().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                let cell = game.board.cell_mut(pos)?;
                cell.status = saved.status;
                cell.is_mine = saved.is_mine;
                cell.adjacent_mines = saved.adjacent_mine_count;

                if saved.is_mine {
                    mine_count += 1;
                }
                if saved.status == CellStatus::Flagged {
                    flag_count += 1;
                }
            }
        }

        if mine_count == 0 {
            game.board.restore_flag_count(flag_count);
            debug!("restored a board without deployed mines; keeping the fresh mine sample");
        } else {
            game.board.restore_counters(flag_count, mine_count);
            game.is_first_move = false;
            game.tiles_to_reveal = snapshot.tiles_to_reveal;
        }
        game.status = snapshot.status;
        debug!(
            "restored {}x{} {} game, status {:?}",
            snapshot.rows, snapshot.cols, snapshot.difficulty, snapshot.status
        );
        Ok(game)
    }
}
