//! Core type definitions for the engine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 0-indexed coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Move one step in a direction, or `None` if that leaves the grid.
    ///
    /// Neighbors are clipped at the edges; there is no wraparound.
    pub fn step(&self, direction: Direction, dims: Dimensions) -> Option<Position> {
        let (dr, dc) = direction.to_delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        dims.contains(next).then_some(next)
    }

    /// Offset by a non-negative delta, or `None` on overflow
    pub fn offset(&self, rows: usize, cols: usize) -> Option<Position> {
        Some(Position::new(
            self.row.checked_add(rows)?,
            self.col.checked_add(cols)?,
        ))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular grid extent. Both sides are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major index of an in-bounds position
    pub fn index_of(&self, pos: Position) -> Result<usize> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(pos.row * self.cols + pos.col)
    }

    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    /// The rectangle shared by both extents, anchored at the origin
    pub fn overlap(&self, other: &Dimensions) -> Dimensions {
        Dimensions {
            rows: self.rows.min(other.rows),
            cols: self.cols.min(other.cols),
        }
    }

    /// Iterator over every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.area()).map(move |i| Position::new(i / cols, i % cols))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// One of the eight Moore-neighborhood directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// (row delta, col delta)
    pub fn to_delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// Cell variant. Fixed for the lifetime of a cell; replacing the kind means
/// placing a new cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Animal,
    Plant,
    Wall,
}

impl CellKind {
    /// Survival/birth rule for this kind given `living_neighbors` in 0..=8.
    ///
    /// | kind   | alive            | dead          |
    /// |--------|------------------|---------------|
    /// | Animal | n == 2 or n == 3 | n == 3        |
    /// | Plant  | 1 <= n <= 4      | n == 2 or 3   |
    /// | Wall   | false            | false         |
    pub fn next_state(&self, alive: bool, living_neighbors: u8) -> bool {
        match (self, alive) {
            (CellKind::Animal, true) => matches!(living_neighbors, 2 | 3),
            (CellKind::Animal, false) => living_neighbors == 3,
            (CellKind::Plant, true) => (1..=4).contains(&living_neighbors),
            (CellKind::Plant, false) => matches!(living_neighbors, 2 | 3),
            (CellKind::Wall, _) => false,
        }
    }

    /// Whether a cell of this kind can ever be alive
    pub fn is_organic(&self) -> bool {
        !matches!(self, CellKind::Wall)
    }

    /// Initial state of a freshly placed cell of this kind
    pub fn alive_on_placement(&self) -> bool {
        matches!(self, CellKind::Plant)
    }

    /// Single-character tag for text rendering
    pub fn label(&self) -> char {
        match self {
            CellKind::Animal => 'A',
            CellKind::Plant => 'P',
            CellKind::Wall => 'W',
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Animal => "Animal",
            CellKind::Plant => "Plant",
            CellKind::Wall => "Wall",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_reject_zero() {
        assert!(matches!(
            Dimensions::new(0, 5),
            Err(Error::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(Dimensions::new(3, 0).is_err());
        assert!(Dimensions::new(1, 1).is_ok());
    }

    #[test]
    fn test_index_of_bounds() {
        let dims = Dimensions::new(3, 4).unwrap();
        assert_eq!(dims.index_of(Position::new(0, 0)).unwrap(), 0);
        assert_eq!(dims.index_of(Position::new(2, 3)).unwrap(), 11);
        assert!(matches!(
            dims.index_of(Position::new(3, 0)),
            Err(Error::OutOfBounds { row: 3, col: 0, .. })
        ));
        assert!(dims.index_of(Position::new(0, 4)).is_err());
        assert_eq!(dims.position_of(7), Position::new(1, 3));
    }

    #[test]
    fn test_step_clips_at_edges() {
        let dims = Dimensions::new(3, 3).unwrap();
        let corner = Position::new(0, 0);

        let in_bounds: Vec<Position> = Direction::all()
            .iter()
            .filter_map(|d| corner.step(*d, dims))
            .collect();

        assert_eq!(in_bounds.len(), 3);
        assert!(in_bounds.contains(&Position::new(0, 1)));
        assert!(in_bounds.contains(&Position::new(1, 0)));
        assert!(in_bounds.contains(&Position::new(1, 1)));

        let far = Position::new(2, 2);
        assert_eq!(far.step(Direction::SouthEast, dims), None);
        assert_eq!(far.step(Direction::NorthWest, dims), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_offset_overflow() {
        let origin = Position::new(2, 3);
        assert_eq!(origin.offset(1, 4), Some(Position::new(3, 7)));
        assert_eq!(Position::new(0, usize::MAX).offset(0, 1), None);
        assert_eq!(Position::new(usize::MAX, 0).offset(1, 0), None);
        assert_eq!(Position::new(usize::MAX, 0).offset(0, 5), Some(Position::new(usize::MAX, 5)));
    }

    #[test]
    fn test_overlap() {
        let a = Dimensions::new(5, 2).unwrap();
        let b = Dimensions::new(3, 7).unwrap();
        assert_eq!(a.overlap(&b), Dimensions::new(3, 2).unwrap());
    }

    #[test]
    fn test_animal_rule() {
        let expected_alive = [false, false, true, true, false, false, false, false, false];
        let expected_dead = [false, false, false, true, false, false, false, false, false];
        for n in 0..=8u8 {
            assert_eq!(CellKind::Animal.next_state(true, n), expected_alive[n as usize]);
            assert_eq!(CellKind::Animal.next_state(false, n), expected_dead[n as usize]);
        }
    }

    #[test]
    fn test_plant_rule() {
        let expected_alive = [false, true, true, true, true, false, false, false, false];
        let expected_dead = [false, false, true, true, false, false, false, false, false];
        for n in 0..=8u8 {
            assert_eq!(CellKind::Plant.next_state(true, n), expected_alive[n as usize]);
            assert_eq!(CellKind::Plant.next_state(false, n), expected_dead[n as usize]);
        }
    }

    #[test]
    fn test_wall_rule() {
        for n in 0..=8u8 {
            assert!(!CellKind::Wall.next_state(true, n));
            assert!(!CellKind::Wall.next_state(false, n));
        }
    }

    #[test]
    fn test_labels_and_placement() {
        assert_eq!(CellKind::Animal.label(), 'A');
        assert_eq!(CellKind::Plant.label(), 'P');
        assert_eq!(CellKind::Wall.label(), 'W');

        assert!(!CellKind::Animal.alive_on_placement());
        assert!(CellKind::Plant.alive_on_placement());
        assert!(!CellKind::Wall.alive_on_placement());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&CellKind::Plant).unwrap();
        assert_eq!(json, "\"plant\"");
        let kind: CellKind = serde_json::from_str("\"wall\"").unwrap();
        assert_eq!(kind, CellKind::Wall);
    }
}
