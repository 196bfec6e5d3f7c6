//! The island tile grid.
//!
//! `IslandGrid` owns every tile in an arena indexed by `TileId`. Two lookup
//! indexes (by name and by coordinate) cover the tiles still in play; when a
//! tile sinks it is retired from both, so adjacency and deck matching never
//! see it again. The arena entry stays behind with state `Sunk` so ids held
//! elsewhere never dangle.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::{Adjacency, Coord, FloodState, Tile, TileId};
use crate::core::error::InvariantError;

/// Neighbour list; eight is the most any position can have.
pub type Neighbors = SmallVec<[TileId; 8]>;

/// Fixed-size board of island tiles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GridRecord", into = "GridRecord")]
pub struct IslandGrid {
    tiles: Vec<Tile>,
    escape: TileId,
    /// Active tiles by name.
    by_name: FxHashMap<String, TileId>,
    /// Active tiles by coordinate.
    by_coord: FxHashMap<Coord, TileId>,
}

/// Serialized form: the arena alone. Indexes are rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct GridRecord {
    tiles: Vec<Tile>,
    escape: TileId,
}

impl From<GridRecord> for IslandGrid {
    fn from(record: GridRecord) -> Self {
        let mut grid = Self {
            tiles: record.tiles,
            escape: record.escape,
            by_name: FxHashMap::default(),
            by_coord: FxHashMap::default(),
        };
        grid.rebuild_indexes();
        grid
    }
}

impl From<IslandGrid> for GridRecord {
    fn from(grid: IslandGrid) -> Self {
        Self {
            tiles: grid.tiles,
            escape: grid.escape,
        }
    }
}

impl PartialEq for IslandGrid {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles && self.escape == other.escape
    }
}

impl Eq for IslandGrid {}

impl IslandGrid {
    /// Build a grid from tiles whose ids match their position in `tiles`.
    ///
    /// # Errors
    ///
    /// Returns `InvariantError::MissingTile` if no tile is named `escape_name`.
    ///
    /// # Panics
    ///
    /// Panics if tile ids are not `0..len` in order, or if two tiles share a
    /// name or coordinate.
    pub fn new(tiles: Vec<Tile>, escape_name: &str) -> Result<Self, InvariantError> {
        for (index, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.id.index(), index, "tile ids must match arena order");
        }
        let escape = tiles
            .iter()
            .find(|t| t.name == escape_name)
            .map(|t| t.id)
            .ok_or_else(|| InvariantError::MissingTile(escape_name.to_string()))?;

        let mut grid = Self {
            tiles,
            escape,
            by_name: FxHashMap::default(),
            by_coord: FxHashMap::default(),
        };
        grid.rebuild_indexes();
        assert_eq!(grid.by_name.len(), grid.active_count(), "duplicate tile name");
        assert_eq!(grid.by_coord.len(), grid.active_count(), "duplicate tile coordinate");
        Ok(grid)
    }

    fn rebuild_indexes(&mut self) {
        self.by_name.clear();
        self.by_coord.clear();
        for tile in self.tiles.iter().filter(|t| !t.is_sunk()) {
            self.by_name.insert(tile.name.clone(), tile.id);
            self.by_coord.insert(tile.coord, tile.id);
        }
    }

    // === Queries ===

    /// Any tile ever placed, sunk or not.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Every tile in id order, including sunk ones.
    #[must_use]
    pub fn all_tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles still in play, in id order.
    pub fn active_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| !t.is_sunk())
    }

    /// Number of tiles still in play.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_tiles().count()
    }

    /// Look up an active tile by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    /// The active tile at a coordinate.
    #[must_use]
    pub fn at(&self, coord: Coord) -> Option<TileId> {
        self.by_coord.get(&coord).copied()
    }

    /// The tile, sunk or active, originally placed at a coordinate.
    #[must_use]
    pub fn placed_at(&self, coord: Coord) -> Option<TileId> {
        self.tiles.iter().find(|t| t.coord == coord).map(|t| t.id)
    }

    /// The tile adventurers must escape from.
    #[must_use]
    pub fn escape_tile(&self) -> TileId {
        self.escape
    }

    /// Unknown ids count as sunk: they are not in play.
    #[must_use]
    pub fn is_sunk(&self, id: TileId) -> bool {
        self.get(id).map_or(true, Tile::is_sunk)
    }

    #[must_use]
    pub fn is_flooded(&self, id: TileId) -> bool {
        self.get(id).is_some_and(Tile::is_flooded)
    }

    /// Active tiles neighbouring `id` under `adjacency`.
    #[must_use]
    pub fn neighbors(&self, id: TileId, adjacency: Adjacency) -> Neighbors {
        let Some(tile) = self.get(id) else {
            return Neighbors::new();
        };
        tile.coord
            .neighbors(adjacency)
            .filter_map(|c| self.at(c))
            .collect()
    }

    /// Whether both tiles are in play and adjacent under `adjacency`.
    #[must_use]
    pub fn are_adjacent(&self, a: TileId, b: TileId, adjacency: Adjacency) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(ta), Some(tb)) => ta.coord.is_adjacent(tb.coord, adjacency),
            _ => false,
        }
    }

    // === Mutation ===

    /// Worsen a tile by one step: Normal→Flooded or Flooded→Sunk.
    ///
    /// Returns the new state. Sinking retires the tile from the lookups.
    ///
    /// # Errors
    ///
    /// Flooding a Sunk (or unknown) tile is a caller bug and returns
    /// `InvariantError::FloodSunkTile`.
    pub fn flood(&mut self, id: TileId) -> Result<FloodState, InvariantError> {
        let tile = self
            .tiles
            .get_mut(id.index())
            .ok_or_else(|| InvariantError::FloodSunkTile(id).logged())?;

        tile.state = match tile.state {
            FloodState::Normal => FloodState::Flooded,
            FloodState::Flooded => FloodState::Sunk,
            FloodState::Sunk => return Err(InvariantError::FloodSunkTile(id).logged()),
        };

        let state = tile.state;
        if state == FloodState::Sunk {
            let (name, coord) = (tile.name.clone(), tile.coord);
            self.by_name.remove(&name);
            self.by_coord.remove(&coord);
            log::info!("{name} sank into the sea");
        } else {
            log::debug!("{} is flooded", tile.name);
        }
        Ok(state)
    }

    /// Flooded→Normal. Returns false (no change) for Normal or Sunk tiles.
    pub fn shore_up(&mut self, id: TileId) -> bool {
        match self.tiles.get_mut(id.index()) {
            Some(tile) if tile.state == FloodState::Flooded => {
                tile.state = FloodState::Normal;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_grid() -> IslandGrid {
        // A -- B -- C on one row, D under B.
        let tiles = vec![
            Tile::new(TileId(0), "A", Coord::new(0, 0)),
            Tile::new(TileId(1), "B", Coord::new(0, 1)),
            Tile::new(TileId(2), "C", Coord::new(0, 2)),
            Tile::new(TileId(3), "D", Coord::new(1, 1)),
        ];
        IslandGrid::new(tiles, "A").unwrap()
    }

    #[test]
    fn test_lookup() {
        let grid = line_grid();
        assert_eq!(grid.find("C"), Some(TileId(2)));
        assert_eq!(grid.at(Coord::new(1, 1)), Some(TileId(3)));
        assert_eq!(grid.escape_tile(), TileId(0));
        assert_eq!(grid.find("Z"), None);
    }

    #[test]
    fn test_missing_escape_tile() {
        let tiles = vec![Tile::new(TileId(0), "A", Coord::new(0, 0))];
        assert_eq!(
            IslandGrid::new(tiles, "Nowhere").unwrap_err(),
            InvariantError::MissingTile("Nowhere".to_string())
        );
    }

    #[test]
    fn test_flood_then_sink() {
        let mut grid = line_grid();
        assert_eq!(grid.flood(TileId(1)), Ok(FloodState::Flooded));
        assert!(grid.is_flooded(TileId(1)));
        assert_eq!(grid.flood(TileId(1)), Ok(FloodState::Sunk));
        assert!(grid.is_sunk(TileId(1)));

        // Retired from lookups but still in the arena.
        assert_eq!(grid.find("B"), None);
        assert_eq!(grid.at(Coord::new(0, 1)), None);
        assert_eq!(grid.placed_at(Coord::new(0, 1)), Some(TileId(1)));
        assert_eq!(grid.get(TileId(1)).map(|t| t.state), Some(FloodState::Sunk));
        assert_eq!(grid.active_count(), 3);
    }

    #[test]
    fn test_flood_sunk_tile_is_an_error() {
        let mut grid = line_grid();
        grid.flood(TileId(2)).unwrap();
        grid.flood(TileId(2)).unwrap();
        assert_eq!(grid.flood(TileId(2)), Err(InvariantError::FloodSunkTile(TileId(2))));
        assert_eq!(grid.flood(TileId(9)), Err(InvariantError::FloodSunkTile(TileId(9))));
    }

    #[test]
    fn test_shore_up_only_from_flooded() {
        let mut grid = line_grid();
        assert!(!grid.shore_up(TileId(0)));

        grid.flood(TileId(0)).unwrap();
        assert!(grid.shore_up(TileId(0)));
        assert_eq!(grid.get(TileId(0)).map(|t| t.state), Some(FloodState::Normal));

        grid.flood(TileId(0)).unwrap();
        grid.flood(TileId(0)).unwrap();
        assert!(!grid.shore_up(TileId(0)));
        assert!(grid.is_sunk(TileId(0)));
    }

    #[test]
    fn test_neighbors_skip_sunk_tiles() {
        let mut grid = line_grid();
        let mut around_b = grid.neighbors(TileId(1), Adjacency::Orthogonal).to_vec();
        around_b.sort();
        assert_eq!(around_b, vec![TileId(0), TileId(2), TileId(3)]);

        grid.flood(TileId(2)).unwrap();
        grid.flood(TileId(2)).unwrap();
        let mut around_b = grid.neighbors(TileId(1), Adjacency::Orthogonal).to_vec();
        around_b.sort();
        assert_eq!(around_b, vec![TileId(0), TileId(3)]);

        // Diagonal: A and D touch corners.
        assert!(grid.are_adjacent(TileId(0), TileId(3), Adjacency::WithDiagonals));
        assert!(!grid.are_adjacent(TileId(0), TileId(3), Adjacency::Orthogonal));
    }

    #[test]
    fn test_serde_rebuilds_indexes() {
        let mut grid = line_grid();
        grid.flood(TileId(3)).unwrap();
        grid.flood(TileId(3)).unwrap();
        grid.flood(TileId(1)).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let back: IslandGrid = serde_json::from_str(&json).unwrap();

        assert_eq!(back.all_tiles(), grid.all_tiles());
        assert_eq!(back.find("D"), None);
        assert_eq!(back.find("B"), Some(TileId(1)));
        assert!(back.is_flooded(TileId(1)));
    }
}
