//! Treasure records: where each treasure can be captured, and whether it has
//! been.

use serde::{Deserialize, Serialize};

use super::card::TreasureType;
use crate::board::{treasure_sites, IslandGrid, TileId};
use crate::core::error::InvariantError;
use crate::core::player::PlayerId;

/// One treasure and its capture state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasure {
    pub kind: TreasureType,
    /// The two tiles the treasure can be captured from.
    pub sites: [TileId; 2],
    captured_by: Option<PlayerId>,
}

impl Treasure {
    #[must_use]
    pub fn new(kind: TreasureType, sites: [TileId; 2]) -> Self {
        Self {
            kind,
            sites,
            captured_by: None,
        }
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured_by.is_some()
    }

    #[must_use]
    pub fn captured_by(&self) -> Option<PlayerId> {
        self.captured_by
    }

    /// Mark as captured. Returns false if it already was; the first captor
    /// is kept.
    pub fn capture(&mut self, player: PlayerId) -> bool {
        if self.captured_by.is_some() {
            return false;
        }
        self.captured_by = Some(player);
        true
    }

    /// Uncaptured with both sites sunk: it can never be captured.
    #[must_use]
    pub fn is_lost(&self, grid: &IslandGrid) -> bool {
        !self.is_captured() && self.sites.iter().all(|&site| grid.is_sunk(site))
    }

    /// Whether `tile` is one of this treasure's sites.
    #[must_use]
    pub fn is_site(&self, tile: TileId) -> bool {
        self.sites.contains(&tile)
    }
}

/// Build the four treasure records against a grid, in `TreasureType::ALL`
/// order.
///
/// # Errors
///
/// Returns `InvariantError::MissingTile` if a site is not on the board.
pub fn treasures_for(grid: &IslandGrid) -> Result<Vec<Treasure>, InvariantError> {
    TreasureType::ALL
        .iter()
        .map(|&kind| -> Result<Treasure, InvariantError> {
            let [first, second] = treasure_sites(kind);
            let lookup = |name: &str| {
                grid.find(name)
                    .ok_or_else(|| InvariantError::MissingTile(name.to_string()))
            };
            Ok(Treasure::new(kind, [lookup(first)?, lookup(second)?]))
        })
        .collect()
}
