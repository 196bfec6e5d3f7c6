//! Tile grid: island tiles, their flood states and board geometry.
//!
//! - `tile`: ids, coordinates, adjacency modes, flood states
//! - `grid`: the tile arena with active-tile lookups
//! - `layout`: the standard 24-tile island

pub mod grid;
pub mod layout;
pub mod tile;

pub use grid::{IslandGrid, Neighbors};
pub use layout::{standard_island, treasure_sites, Layout, TileDef, ESCAPE_TILE, TILE_DEFS};
pub use tile::{Adjacency, Coord, FloodState, Tile, TileId};
