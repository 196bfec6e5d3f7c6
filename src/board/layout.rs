//! The standard island: 24 named tiles on a 6×6 diamond.
//!
//! Tile ids follow `TILE_DEFS` order in every game, so `Fools' Landing` is
//! always the same id whatever the seed. Only positions are shuffled.

use super::grid::IslandGrid;
use super::tile::{Coord, Tile, TileId};
use crate::cards::TreasureType;
use crate::core::error::InvariantError;
use crate::core::rng::GameRng;
use crate::roles::Role;

/// Name of the tile the adventurers must escape from.
pub const ESCAPE_TILE: &str = "Fools' Landing";

/// Static description of one standard tile.
#[derive(Clone, Copy, Debug)]
pub struct TileDef {
    pub name: &'static str,
    pub treasure: Option<TreasureType>,
    pub start_for: Option<Role>,
}

const fn plain(name: &'static str) -> TileDef {
    TileDef { name, treasure: None, start_for: None }
}

const fn treasure(name: &'static str, treasure: TreasureType) -> TileDef {
    TileDef { name, treasure: Some(treasure), start_for: None }
}

const fn gate(name: &'static str, role: Role) -> TileDef {
    TileDef { name, treasure: None, start_for: Some(role) }
}

/// The 24 island tiles, in id order.
pub const TILE_DEFS: [TileDef; 24] = [
    treasure("Temple of the Moon", TreasureType::EarthStone),
    treasure("Temple of the Sun", TreasureType::EarthStone),
    treasure("Cave of Embers", TreasureType::CrystalOfFire),
    gate("Bronze Gate", Role::Engineer),
    gate(ESCAPE_TILE, Role::Pilot),
    treasure("Cave of Shadows", TreasureType::CrystalOfFire),
    gate("Copper Gate", Role::Explorer),
    plain("Breakers Bridge"),
    plain("Cliffs of Abandon"),
    plain("Crimson Forest"),
    plain("Dunes of Deception"),
    gate("Gold Gate", Role::Navigator),
    treasure("Howling Garden", TreasureType::StatueOfTheWind),
    gate("Iron Gate", Role::Diver),
    plain("Lost Lagoon"),
    plain("Misty Marsh"),
    plain("Observatory"),
    treasure("Whispering Garden", TreasureType::StatueOfTheWind),
    treasure("Coral Palace", TreasureType::OceansChalice),
    plain("Phantom Rock"),
    gate("Silver Gate", Role::Messenger),
    treasure("Tidal Palace", TreasureType::OceansChalice),
    plain("Twilight Hollow"),
    plain("Watchtower"),
];

/// Board positions in row-major order: row widths 2, 4, 6, 6, 4, 2.
#[must_use]
pub fn island_positions() -> Vec<Coord> {
    const ROWS: [(i8, i8); 6] = [(2, 3), (1, 4), (0, 5), (0, 5), (1, 4), (2, 3)];
    ROWS.iter()
        .enumerate()
        .flat_map(|(row, &(first, last))| (first..=last).map(move |col| Coord::new(row as i8, col)))
        .collect()
}

/// Candidate tile names for a treasure.
#[must_use]
pub fn treasure_sites(kind: TreasureType) -> [&'static str; 2] {
    let mut sites = TILE_DEFS
        .iter()
        .filter(|def| def.treasure == Some(kind))
        .map(|def| def.name);
    // Every treasure has exactly two sites in TILE_DEFS.
    [sites.next().unwrap_or(ESCAPE_TILE), sites.next().unwrap_or(ESCAPE_TILE)]
}

/// How tiles are placed on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Random placement drawn from the game RNG.
    #[default]
    Shuffled,
    /// `TILE_DEFS` order laid out row-major; for tests and tutorials.
    Fixed,
}

/// Build the standard island grid.
///
/// # Errors
///
/// Only fails if the escape tile is missing from the definitions.
pub fn standard_island(layout: Layout, rng: &mut GameRng) -> Result<IslandGrid, InvariantError> {
    let mut positions = island_positions();
    if layout == Layout::Shuffled {
        rng.shuffle(&mut positions);
    }

    let tiles = TILE_DEFS
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(index, (def, coord))| {
            let mut tile = Tile::new(TileId(index as u8), def.name, coord);
            tile.treasure = def.treasure;
            tile.start_for = def.start_for;
            tile
        })
        .collect();

    IslandGrid::new(tiles, ESCAPE_TILE)
}
