//! Card kinds for the two decks.
//!
//! The treasure deck mixes treasure cards with three special cards; the
//! flood deck holds one card per island tile.

use serde::{Deserialize, Serialize};

use crate::board::{IslandGrid, TileId};

/// The four treasures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreasureType {
    EarthStone,
    StatueOfTheWind,
    CrystalOfFire,
    OceansChalice,
}

impl TreasureType {
    /// Every treasure, in evaluation order.
    pub const ALL: [TreasureType; 4] = [
        TreasureType::EarthStone,
        TreasureType::StatueOfTheWind,
        TreasureType::CrystalOfFire,
        TreasureType::OceansChalice,
    ];
}

impl std::fmt::Display for TreasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TreasureType::EarthStone => "The Earth Stone",
            TreasureType::StatueOfTheWind => "The Statue of the Wind",
            TreasureType::CrystalOfFire => "The Crystal of Fire",
            TreasureType::OceansChalice => "The Ocean's Chalice",
        })
    }
}

/// A card from the treasure deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreasureCard {
    Treasure(TreasureType),
    HelicopterLift,
    Sandbags,
    /// Resolved the moment it is drawn; never held.
    WatersRise,
}

impl TreasureCard {
    /// Cards a player may hold and play at will.
    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, TreasureCard::HelicopterLift | TreasureCard::Sandbags)
    }

    /// Only treasure cards change hands.
    #[must_use]
    pub fn is_tradable(self) -> bool {
        matches!(self, TreasureCard::Treasure(_))
    }

    #[must_use]
    pub fn treasure(self) -> Option<TreasureType> {
        match self {
            TreasureCard::Treasure(kind) => Some(kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for TreasureCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreasureCard::Treasure(kind) => write!(f, "{kind}"),
            TreasureCard::HelicopterLift => f.write_str("Helicopter Lift"),
            TreasureCard::Sandbags => f.write_str("Sandbags"),
            TreasureCard::WatersRise => f.write_str("Waters Rise!"),
        }
    }
}

/// A flood card names one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FloodCard(pub TileId);

impl FloodCard {
    #[must_use]
    pub const fn tile(self) -> TileId {
        self.0
    }
}

/// Cards of each treasure in the deck.
pub const TREASURE_CARDS_PER_TYPE: usize = 5;
/// Helicopter Lift cards in the deck.
pub const HELICOPTER_LIFT_CARDS: usize = 3;
/// Sandbags cards in the deck.
pub const SANDBAGS_CARDS: usize = 2;
/// Waters Rise cards in the deck.
pub const WATERS_RISE_CARDS: usize = 3;

/// The full 28-card treasure deck, unshuffled.
#[must_use]
pub fn standard_treasure_cards() -> Vec<TreasureCard> {
    let mut cards = Vec::with_capacity(28);
    for kind in TreasureType::ALL {
        cards.extend(std::iter::repeat(TreasureCard::Treasure(kind)).take(TREASURE_CARDS_PER_TYPE));
    }
    cards.extend(std::iter::repeat(TreasureCard::HelicopterLift).take(HELICOPTER_LIFT_CARDS));
    cards.extend(std::iter::repeat(TreasureCard::Sandbags).take(SANDBAGS_CARDS));
    cards.extend(std::iter::repeat(TreasureCard::WatersRise).take(WATERS_RISE_CARDS));
    cards
}

/// One flood card per tile in play, unshuffled.
#[must_use]
pub fn flood_cards_for(grid: &IslandGrid) -> Vec<FloodCard> {
    grid.active_tiles().map(|t| FloodCard(t.id)).collect()
}
