use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell. The string forms ("hidden",
/// "wrong-flag", ...) appear only at the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellStatus {
    #[default]
    Hidden,
    Flagged,
    Revealed,
    /// A flag that turned out to sit on a non-mine cell; set on loss.
    WrongFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub(crate) status: CellStatus,
    pub(crate) is_mine: bool,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Meaningful only after mine deployment; 0 before it.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn is_flagged(&self) -> bool {
        self.status == CellStatus::Flagged
    }

    pub fn is_revealed(&self) -> bool {
        self.status == CellStatus::Revealed
    }

    /// Hidden -> revealed. Returns whether the transition happened.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.status != CellStatus::Hidden {
            return false;
        }
        self.status = CellStatus::Revealed;
        true
    }
}
