//! Game-over evaluation.
//!
//! Pure over the game's parts; the engine calls [`evaluate`] after every
//! mutation and latches the first result.

use serde::{Deserialize, Serialize};

use crate::board::IslandGrid;
use crate::cards::{Treasure, TreasureType};
use crate::core::player::{PlayerId, PlayerMap};
use crate::roles::Adventurer;
use crate::water::WaterMeter;

/// Why the island claimed the party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    WaterAtMax,
    EscapeTileSunk,
    TreasureLost(TreasureType),
    PlayerDrowned(PlayerId),
}

impl std::fmt::Display for LossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossReason::WaterAtMax => write!(f, "the water level reached the skull"),
            LossReason::EscapeTileSunk => write!(f, "the escape tile sank"),
            LossReason::TreasureLost(kind) => write!(f, "{kind} sank beyond reach"),
            LossReason::PlayerDrowned(player) => write!(f, "{player} drowned"),
        }
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost(LossReason),
}

impl GameOutcome {
    #[must_use]
    pub fn is_won(self) -> bool {
        self == GameOutcome::Won
    }

    #[must_use]
    pub fn loss_reason(self) -> Option<LossReason> {
        match self {
            GameOutcome::Won => None,
            GameOutcome::Lost(reason) => Some(reason),
        }
    }
}

/// Everything the evaluator looks at.
#[derive(Clone, Copy, Debug)]
pub struct OutcomeInputs<'a> {
    pub grid: &'a IslandGrid,
    pub meter: &'a WaterMeter,
    pub treasures: &'a [Treasure],
    pub players: &'a PlayerMap<Adventurer>,
    /// First adventurer left without a swim destination, if any.
    pub drowned: Option<PlayerId>,
    pub lifted_off: bool,
    pub require_lift_off: bool,
}

/// Evaluate the end conditions. `None` means play continues.
///
/// Losses are checked first, in a fixed order: water at maximum, escape tile
/// sunk, a treasure lost (in `TreasureType::ALL` order), an adventurer
/// drowned. Then the win: every treasure captured, everyone on the escape
/// tile, and lift-off played when the config requires it.
#[must_use]
pub fn evaluate(inputs: &OutcomeInputs<'_>) -> Option<GameOutcome> {
    if let Some(reason) = loss_reason(inputs) {
        return Some(GameOutcome::Lost(reason));
    }
    if all_aboard(inputs.grid, inputs.treasures, inputs.players)
        && (inputs.lifted_off || !inputs.require_lift_off)
    {
        return Some(GameOutcome::Won);
    }
    None
}

fn loss_reason(inputs: &OutcomeInputs<'_>) -> Option<LossReason> {
    if inputs.meter.is_at_max() {
        return Some(LossReason::WaterAtMax);
    }
    if inputs.grid.is_sunk(inputs.grid.escape_tile()) {
        return Some(LossReason::EscapeTileSunk);
    }
    // The records are built in ALL order; look each kind up anyway so a
    // restored snapshot with reordered records reports the same treasure.
    for kind in TreasureType::ALL {
        let lost = inputs
            .treasures
            .iter()
            .any(|t| t.kind == kind && t.is_lost(inputs.grid));
        if lost {
            return Some(LossReason::TreasureLost(kind));
        }
    }
    inputs.drowned.map(LossReason::PlayerDrowned)
}

/// Every treasure captured and every adventurer on the escape tile: the
/// precondition for lift-off.
#[must_use]
pub fn all_aboard(grid: &IslandGrid, treasures: &[Treasure], players: &PlayerMap<Adventurer>) -> bool {
    let escape = grid.escape_tile();
    treasures.iter().all(Treasure::is_captured)
        && players.values().all(|a| a.tile() == Some(escape))
}
