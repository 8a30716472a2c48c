pub mod board;
pub mod cell;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod position;
pub mod save;

pub use board::Board;
pub use cell::{Cell, CellStatus};
pub use difficulty::Difficulty;
pub use error::GameError;
pub use game::{Action, Game, GameEvent, GameStatus};
pub use position::Position;
pub use save::{CellSnapshot, GameSnapshot};
