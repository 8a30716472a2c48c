use crate::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Position {0:?} is out of bounds")]
    OutOfBounds(Position),
    #[error("Cannot reveal or flag cells; the game is already over")]
    NotPlaying,
    #[error("Mines have already been deployed")]
    AlreadyDeployed,
    #[error("Invalid board dimensions {rows}x{cols}; each side must be in 5..=100")]
    InvalidDimensions { rows: u32, cols: u32 },
    #[error("Unknown difficulty '{0}'")]
    InvalidDifficulty(String),
    #[error("Cell at {0:?} was expected to be hidden")]
    ExpectedHidden(Position),
    #[error("Snapshot grid does not match its declared {rows}x{cols} dimensions")]
    InvalidBoardShape { rows: u32, cols: u32 },
}
