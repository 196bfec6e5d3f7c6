//! Turn phases and per-turn counters.

use serde::{Deserialize, Serialize};

/// Where the active adventurer is in their turn.
///
/// `Action → DrawTreasure → DrawFlood`, then the next adventurer's `Action`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Action,
    DrawTreasure,
    DrawFlood,
}

impl Phase {
    /// The phase that follows this one. `DrawFlood` wraps to the next
    /// adventurer's `Action`.
    #[must_use]
    pub fn next(self) -> Phase {
        match self {
            Phase::Action => Phase::DrawTreasure,
            Phase::DrawTreasure => Phase::DrawFlood,
            Phase::DrawFlood => Phase::Action,
        }
    }
}

/// Counters scoped to the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Turn number, starting at 1.
    pub number: u32,
    pub actions_remaining: u8,
    /// Treasure cards drawn so far in the draw-treasure phase.
    pub treasure_drawn: u8,
    /// Next history sequence number within this turn.
    pub sequence: u32,
}

impl TurnState {
    /// The first turn of a game.
    #[must_use]
    pub fn first(actions: u8) -> Self {
        Self {
            number: 1,
            actions_remaining: actions,
            treasure_drawn: 0,
            sequence: 0,
        }
    }

    /// Roll over to the following turn.
    pub fn advance(&mut self, actions: u8) {
        *self = Self {
            number: self.number + 1,
            ..Self::first(actions)
        };
    }
}
