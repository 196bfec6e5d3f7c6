//! What each engine operation did, returned to the caller.
//!
//! Reports are informational; the authoritative state is always the `Game`
//! queries.

use serde::{Deserialize, Serialize};

use super::outcome::GameOutcome;
use super::phase::Phase;
use crate::board::TileId;
use crate::cards::TreasureCard;
use crate::core::player::PlayerId;

/// Result of an action-phase operation (or a discard).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub actions_remaining: u8,
    /// Phase after the operation; `DrawTreasure` once the budget ran out.
    pub phase: Phase,
    /// The acting adventurer still has a free shore-up open.
    pub may_shore_up_again: bool,
    /// Cards the automatic fallback discarded from the receiver.
    pub discarded: Vec<TreasureCard>,
    pub outcome: Option<GameOutcome>,
}

/// One card drawn from the treasure deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureDraw {
    /// Went to the active adventurer's hand.
    Card(TreasureCard),
    /// Resolved on the spot; the water reached `level`.
    WatersRise { level: u8 },
    /// Nothing left to draw.
    Empty,
}

/// Result of `draw_treasure_cards`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawReport {
    pub draws: Vec<TreasureDraw>,
    /// Cards the automatic fallback discarded.
    pub discarded: Vec<TreasureCard>,
    /// Drawing stopped until this adventurer discards down to the limit.
    pub pending_discard: Option<PlayerId>,
    pub phase: Phase,
}

/// An adventurer forced off a sinking tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swim {
    pub player: PlayerId,
    /// `None` when there was nowhere to go.
    pub to: Option<TileId>,
}

/// One flood card resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloodEvent {
    Flooded(TileId),
    Sunk { tile: TileId, swims: Vec<Swim> },
    /// The card named a tile that had already sunk; it left play.
    AlreadySunk(TileId),
}

/// Result of `draw_flood_cards`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodReport {
    pub events: Vec<FloodEvent>,
    /// The adventurer whose turn it now is, unless the game ended.
    pub next_player: Option<PlayerId>,
}

/// Result of `advance_turn`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub treasure_draws: Vec<TreasureDraw>,
    /// Cards discarded by the automatic fallback, and whose they were.
    pub discarded: Vec<(PlayerId, TreasureCard)>,
    pub flood: Option<FloodReport>,
    pub outcome: Option<GameOutcome>,
}
