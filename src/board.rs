use std::ops::Index;

use itertools::iproduct;
use log::debug;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Cell, CellStatus, GameError, Position};

/// The cell matrix plus mine/flag bookkeeping. Owned exclusively by [`Game`];
/// the presentation layer only ever sees it through read-only queries.
///
/// [`Game`]: crate::Game
#[derive(Debug, Clone)]
pub struct Board {
    rows: u32,
    cols: u32,
    mine_count: u32,
    grid: Array2<Cell>,
    flag_count: u32,
    mines_deployed: bool,
}

impl Board {
    pub(crate) fn new(rows: u32, cols: u32, mine_count: u32) -> Self {
        Self {
            rows,
            cols,
            mine_count,
            grid: Array2::from_elem((rows as usize, cols as usize), Cell::default()),
            flag_count: 0,
            mines_deployed: false,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn mine_count(&self) -> u32 {
        self.mine_count
    }

    /// Always equals the number of cells with status [`CellStatus::Flagged`].
    pub fn flag_count(&self) -> u32 {
        self.flag_count
    }

    pub fn mines_deployed(&self) -> bool {
        self.mines_deployed
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows as i32 && pos.col >= 0 && pos.col < self.cols as i32
    }

    pub fn cell(&self, pos: Position) -> Result<&Cell, GameError> {
        if self.contains(pos) {
            Ok(&self.grid[pos.index()])
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, GameError> {
        if self.contains(pos) {
            Ok(&mut self.grid[pos.index()])
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (rows, cols) = (self.rows as i32, self.cols as i32);
        iproduct!(0..rows, 0..cols).map(|(row, col)| Position::new(row, col))
    }

    /// In-bounds neighbors of `pos`, in the fixed 8-direction order.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        pos.neighbors().filter(|p| self.contains(*p)).collect()
    }

    /// Places exactly `mine_count` mines on uniformly shuffled candidate
    /// positions, never on `exclude`, then computes every cell's adjacency
    /// count. One-shot: a second call fails.
    pub(crate) fn deploy_mines(
        &mut self,
        exclude: Position,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        if self.mines_deployed {
            return Err(GameError::AlreadyDeployed);
        }

        let mut candidates: Vec<Position> =
            self.positions().filter(|&pos| pos != exclude).collect();
        candidates.shuffle(rng);

        for &pos in candidates.iter().take(self.mine_count as usize) {
            self.grid[pos.index()].is_mine = true;
        }

        for pos in self.positions() {
            let count = self
                .neighbors(pos)
                .into_iter()
                .filter(|&p| self.grid[p.index()].is_mine)
                .count() as u8;
            self.grid[pos.index()].adjacent_mines = count;
        }

        self.mines_deployed = true;
        debug!(
            "deployed {} mines on a {}x{} grid, excluding {:?}",
            self.mine_count, self.rows, self.cols, exclude
        );
        Ok(())
    }

    /// Hidden -> flagged, flagged -> hidden; silent no-op for any other
    /// status. Callers wanting a hard error must pre-check the status.
    pub(crate) fn toggle_flag(&mut self, pos: Position) -> Result<(), GameError> {
        let cell = self.cell_mut(pos)?;
        match cell.status {
            CellStatus::Hidden => {
                cell.status = CellStatus::Flagged;
                self.flag_count += 1;
            }
            CellStatus::Flagged => {
                cell.status = CellStatus::Hidden;
                self.flag_count -= 1;
            }
            CellStatus::Revealed | CellStatus::WrongFlag => {}
        }
        Ok(())
    }

    /// Reveals every mine cell not already revealed. Used on loss.
    pub(crate) fn reveal_mines(&mut self) {
        for cell in self.grid.iter_mut() {
            if cell.is_mine && cell.status != CellStatus::Revealed {
                cell.status = CellStatus::Revealed;
            }
        }
    }

    /// Marks every flagged non-mine cell as wrong-flag. Used on loss.
    pub(crate) fn reveal_incorrect_flags(&mut self) {
        for cell in self.grid.iter_mut() {
            if cell.status == CellStatus::Flagged && !cell.is_mine {
                cell.status = CellStatus::WrongFlag;
            }
        }
    }

    /// Flags every still-hidden mine. Used on win.
    pub(crate) fn flag_remaining_mines(&mut self) {
        for cell in self.grid.iter_mut() {
            if cell.is_mine && cell.status == CellStatus::Hidden {
                cell.status = CellStatus::Flagged;
                self.flag_count += 1;
            }
        }
    }

    /// Resynchronizes the counters after a snapshot restore has replayed the
    /// per-cell fields directly. A grid without mines is treated as not yet
    /// deployed, so a replayed first move still places mines.
    pub(crate) fn restore_counters(&mut self, flag_count: u32, mine_count: u32) {
        self.flag_count = flag_count;
        self.mine_count = mine_count;
        self.mines_deployed = mine_count > 0;
        debug!(
            "restored counters: {} flags, {} mines, deployed={}",
            flag_count, mine_count, self.mines_deployed
        );
    }

    /// Resynchronizes the flag counter alone. Used when a restored grid has
    /// no mines yet, so the freshly sampled mine count must stand.
    pub(crate) fn restore_flag_count(&mut self, flag_count: u32) {
        self.flag_count = flag_count;
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    /// Panics when `pos` is out of bounds; use [`Board::cell`] for checked
    /// access.
    fn index(&self, pos: Position) -> &Self::Output {
        &self.grid[pos.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deployed_board(rows: u32, cols: u32, mines: u32, seed: u64) -> Board {
        let mut board = Board::new(rows, cols, mines);
        let mut rng = StdRng::seed_from_u64(seed);
        board.deploy_mines(Position::new(0, 0), &mut rng).unwrap();
        board
    }

    #[test]
    fn test_deploy_places_exact_mine_count() {
        for seed in 0..20 {
            let board = deployed_board(9, 7, 12, seed);
            let mines = board
                .positions()
                .filter(|&pos| board.cell(pos).unwrap().is_mine())
                .count();
            assert_eq!(mines, 12);
        }
    }

    #[test]
    fn test_deploy_never_mines_the_excluded_cell() {
        for seed in 0..50 {
            let mut board = Board::new(5, 5, 24);
            let mut rng = StdRng::seed_from_u64(seed);
            board.deploy_mines(Position::new(2, 3), &mut rng).unwrap();
            assert!(!board.cell(Position::new(2, 3)).unwrap().is_mine());
        }
    }

    #[test]
    fn test_deploy_twice_fails() {
        let mut board = deployed_board(5, 5, 3, 1);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            board.deploy_mines(Position::new(1, 1), &mut rng),
            Err(GameError::AlreadyDeployed)
        ));
    }

    #[test]
    fn test_adjacency_counts_match_a_recount() {
        let board = deployed_board(8, 8, 10, 99);
        for pos in board.positions() {
            let expected = board
                .neighbors(pos)
                .into_iter()
                .filter(|&p| board.cell(p).unwrap().is_mine())
                .count() as u8;
            assert_eq!(board.cell(pos).unwrap().adjacent_mines(), expected);
        }
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let board = Board::new(5, 5, 3);
        assert!(matches!(
            board.cell(Position::new(5, 0)),
            Err(GameError::OutOfBounds(_))
        ));
        assert!(matches!(
            board.cell(Position::new(0, -1)),
            Err(GameError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_neighbors_clipped_at_corners() {
        let board = Board::new(5, 5, 3);
        assert_eq!(board.neighbors(Position::new(0, 0)).len(), 3);
        assert_eq!(board.neighbors(Position::new(0, 2)).len(), 5);
        assert_eq!(board.neighbors(Position::new(2, 2)).len(), 8);
        assert_eq!(board.neighbors(Position::new(4, 4)).len(), 3);
    }

    #[test]
    fn test_toggle_flag_bookkeeping() {
        let mut board = Board::new(5, 5, 3);
        let pos = Position::new(1, 1);

        board.toggle_flag(pos).unwrap();
        assert!(board.cell(pos).unwrap().is_flagged());
        assert_eq!(board.flag_count(), 1);

        board.toggle_flag(pos).unwrap();
        assert_eq!(board.cell(pos).unwrap().status(), CellStatus::Hidden);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn test_toggle_flag_is_a_no_op_on_revealed_cells() {
        let mut board = Board::new(5, 5, 3);
        let pos = Position::new(2, 2);
        board.cell_mut(pos).unwrap().reveal();

        board.toggle_flag(pos).unwrap();
        assert_eq!(board.cell(pos).unwrap().status(), CellStatus::Revealed);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn test_loss_bookkeeping_reveals_mines_and_marks_wrong_flags() {
        let mut board = deployed_board(6, 6, 8, 4);
        let wrong = board
            .positions()
            .find(|&pos| !board.cell(pos).unwrap().is_mine())
            .unwrap();
        board.toggle_flag(wrong).unwrap();

        board.reveal_mines();
        board.reveal_incorrect_flags();

        for pos in board.positions() {
            let cell = board.cell(pos).unwrap();
            if cell.is_mine() {
                assert_eq!(cell.status(), CellStatus::Revealed);
            }
        }
        assert_eq!(board.cell(wrong).unwrap().status(), CellStatus::WrongFlag);
    }

    #[test]
    fn test_restore_counters_tracks_deployment() {
        let mut board = Board::new(5, 5, 3);
        board.restore_counters(0, 0);
        assert!(!board.mines_deployed());

        board.restore_counters(2, 4);
        assert!(board.mines_deployed());
        assert_eq!(board.flag_count(), 2);
        assert_eq!(board.mine_count(), 4);

        board.restore_flag_count(3);
        assert_eq!(board.flag_count(), 3);
        assert_eq!(board.mine_count(), 4);
    }
}
