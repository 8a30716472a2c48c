use std::fmt;
use std::str::FromStr;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Named difficulty bands. Each maps to a closed mine-density interval; the
/// actual density is drawn uniformly from the interval per game, so two games
/// at the same difficulty usually get different mine counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Brutal,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Brutal,
        Difficulty::Impossible,
    ];

    /// Closed `[min, max]` interval of the fraction of cells that are mines.
    pub fn density_range(self) -> (f64, f64) {
        match self {
            Difficulty::Easy => (0.08, 0.12),
            Difficulty::Medium => (0.13, 0.17),
            Difficulty::Hard => (0.20, 0.25),
            Difficulty::Brutal => (0.30, 0.35),
            Difficulty::Impossible => (0.40, 0.50),
        }
    }

    /// Derives a mine count for a `rows` x `cols` board by sampling a density
    /// from the band. Can yield 0 on very small boards at low densities; that
    /// is accepted and makes the game a trivial win on the first flood.
    pub fn mine_count(self, rows: u32, cols: u32, rng: &mut impl Rng) -> u32 {
        let (min, max) = self.density_range();
        let density = rng.gen_range(min..=max);
        let count = ((rows * cols) as f64 * density).floor() as u32;
        if count == 0 {
            warn!("{self} density sample left a {rows}x{cols} board mine-less");
        }
        count
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "brutal" => Ok(Difficulty::Brutal),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Brutal => "brutal",
            Difficulty::Impossible => "impossible",
        };
        f.write_str(name)
    }
}
