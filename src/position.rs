#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Yields the 8 surrounding positions in fixed order:
    /// NW, N, NE, W, E, SW, S, SE. Bounds are not checked here.
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        (-1..=1).flat_map(move |dr| {
            (-1..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    None
                } else {
                    Some(Position::new(self.row + dr, self.col + dc))
                }
            })
        })
    }

    /// Grid index; only valid once the position is known to be in bounds.
    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.row, 5);
        assert_eq!(pos.col, 10);
    }

    #[test]
    fn test_neighbors_order() {
        let pos = Position::new(1, 1);
        let neighbors: Vec<Position> = pos.neighbors().collect();

        assert_eq!(
            neighbors,
            vec![
                Position::new(0, 0), // NW
                Position::new(0, 1), // N
                Position::new(0, 2), // NE
                Position::new(1, 0), // W
                Position::new(1, 2), // E
                Position::new(2, 0), // SW
                Position::new(2, 1), // S
                Position::new(2, 2), // SE
            ]
        );
    }

    #[test]
    fn test_neighbors_may_leave_the_grid() {
        let neighbors: Vec<Position> = Position::new(0, 0).neighbors().collect();

        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.contains(&Position::new(-1, -1)));
    }
}
