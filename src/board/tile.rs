//! Tiles, coordinates and flood states.

use serde::{Deserialize, Serialize};

use crate::cards::TreasureType;
use crate::roles::Role;

/// Stable identifier of an island tile.
///
/// Ids index the grid's tile arena and never change, even after the tile
/// sinks. Flood cards and adventurers refer to tiles by id only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Board position. Row 0 is the top of the island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Taxicab distance.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u8 {
        (self.row - other.row).unsigned_abs() + (self.col - other.col).unsigned_abs()
    }

    /// Exactly one step along one axis.
    #[must_use]
    pub fn is_orthogonal_to(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }

    /// Exactly one step along both axes.
    #[must_use]
    pub fn is_diagonal_to(self, other: Coord) -> bool {
        (self.row - other.row).abs() == 1 && (self.col - other.col).abs() == 1
    }

    /// Whether `other` neighbours this coordinate under `adjacency`.
    #[must_use]
    pub fn is_adjacent(self, other: Coord, adjacency: Adjacency) -> bool {
        match adjacency {
            Adjacency::Orthogonal => self.is_orthogonal_to(other),
            Adjacency::WithDiagonals => self.is_orthogonal_to(other) || self.is_diagonal_to(other),
        }
    }

    /// Neighbouring coordinates under `adjacency` (may fall off the board).
    pub fn neighbors(self, adjacency: Adjacency) -> impl Iterator<Item = Coord> {
        let offsets: &'static [(i8, i8)] = match adjacency {
            Adjacency::Orthogonal => &ORTHOGONAL,
            Adjacency::WithDiagonals => &WITH_DIAGONALS,
        };
        offsets
            .iter()
            .map(move |&(dr, dc)| Coord::new(self.row + dr, self.col + dc))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const WITH_DIAGONALS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Which neighbouring positions count as adjacent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjacency {
    Orthogonal,
    WithDiagonals,
}

/// Damage level of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FloodState {
    #[default]
    Normal,
    Flooded,
    Sunk,
}

/// One island tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    pub coord: Coord,
    pub state: FloodState,
    /// Treasure that can be captured here.
    pub treasure: Option<TreasureType>,
    /// Role that starts the game on this tile.
    pub start_for: Option<Role>,
}

impl Tile {
    /// Create a dry tile.
    pub fn new(id: TileId, name: impl Into<String>, coord: Coord) -> Self {
        Self {
            id,
            name: name.into(),
            coord,
            state: FloodState::Normal,
            treasure: None,
            start_for: None,
        }
    }

    #[must_use]
    pub fn with_treasure(mut self, treasure: TreasureType) -> Self {
        self.treasure = Some(treasure);
        self
    }

    #[must_use]
    pub fn with_start(mut self, role: Role) -> Self {
        self.start_for = Some(role);
        self
    }

    #[must_use]
    pub fn is_sunk(&self) -> bool {
        self.state == FloodState::Sunk
    }

    #[must_use]
    pub fn is_flooded(&self) -> bool {
        self.state == FloodState::Flooded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_adjacency() {
        let c = Coord::new(2, 2);
        assert!(c.is_adjacent(Coord::new(1, 2), Adjacency::Orthogonal));
        assert!(c.is_adjacent(Coord::new(2, 3), Adjacency::Orthogonal));
        assert!(!c.is_adjacent(Coord::new(3, 3), Adjacency::Orthogonal));
        assert!(!c.is_adjacent(Coord::new(2, 4), Adjacency::Orthogonal));
        assert!(!c.is_adjacent(c, Adjacency::Orthogonal));
    }

    #[test]
    fn test_diagonal_adjacency() {
        let c = Coord::new(2, 2);
        assert!(c.is_adjacent(Coord::new(3, 3), Adjacency::WithDiagonals));
        assert!(c.is_adjacent(Coord::new(1, 1), Adjacency::WithDiagonals));
        assert!(c.is_adjacent(Coord::new(2, 1), Adjacency::WithDiagonals));
        assert!(!c.is_adjacent(Coord::new(4, 4), Adjacency::WithDiagonals));
    }

    #[test]
    fn test_neighbor_counts() {
        let c = Coord::new(0, 0);
        assert_eq!(c.neighbors(Adjacency::Orthogonal).count(), 4);
        assert_eq!(c.neighbors(Adjacency::WithDiagonals).count(), 8);
        assert!(c
            .neighbors(Adjacency::WithDiagonals)
            .all(|n| c.is_adjacent(n, Adjacency::WithDiagonals)));
    }

    #[test]
    fn test_flood_state_order() {
        assert!(FloodState::Normal < FloodState::Flooded);
        assert!(FloodState::Flooded < FloodState::Sunk);
    }
}
