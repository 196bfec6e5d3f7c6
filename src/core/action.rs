//! Commands: every mutating engine operation as a value.
//!
//! Front ends can either call the typed `Game` methods directly or build a
//! `Command` and hand it to `Game::apply`. Every accepted command is stored
//! in the game history as an `ActionRecord`, so a game can be replayed from
//! its seed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::board::TileId;
use crate::cards::TreasureCard;

/// What a special card is aimed at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialTarget {
    /// Sandbags: shore up this flooded tile, anywhere on the island.
    Sandbag { tile: TileId },
    /// Helicopter Lift: fly these co-located adventurers to `destination`.
    Fly {
        passengers: SmallVec<[PlayerId; 4]>,
        destination: TileId,
    },
    /// Helicopter Lift: leave the island and win.
    LiftOff,
}

impl SpecialTarget {
    /// Helicopter flight for the given passengers.
    #[must_use]
    pub fn fly(passengers: &[PlayerId], destination: TileId) -> Self {
        SpecialTarget::Fly {
            passengers: SmallVec::from_slice(passengers),
            destination,
        }
    }
}

/// A complete engine operation.
///
/// ```
/// use sinking_isle::board::TileId;
/// use sinking_isle::core::{Command, PlayerId};
///
/// let step = Command::Move { player: PlayerId(0), tile: TileId(5) };
/// assert!(step.costs_action());
/// assert!(!Command::EndActions.costs_action());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move { player: PlayerId, tile: TileId },
    ShoreUp { player: PlayerId, tile: TileId },
    GiveCard {
        giver: PlayerId,
        receiver: PlayerId,
        card: TreasureCard,
    },
    CaptureTreasure { player: PlayerId },
    PlaySpecial {
        player: PlayerId,
        card: TreasureCard,
        target: SpecialTarget,
    },
    Navigate {
        navigator: PlayerId,
        traveller: PlayerId,
        tile: TileId,
    },
    Discard { player: PlayerId, card: TreasureCard },
    EndActions,
    DrawTreasure,
    DrawFlood,
    AdvanceTurn,
}

impl Command {
    /// Whether the command spends an action point when it succeeds.
    ///
    /// The Engineer's bonus shore-up is the one exception and is decided by
    /// the engine, not here.
    #[must_use]
    pub fn costs_action(&self) -> bool {
        matches!(
            self,
            Command::Move { .. }
                | Command::ShoreUp { .. }
                | Command::GiveCard { .. }
                | Command::CaptureTreasure { .. }
                | Command::PlaySpecial { .. }
                | Command::Navigate { .. }
        )
    }
}

/// An accepted command with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The active player when the command was applied.
    pub player: PlayerId,

    /// The command taken.
    pub command: Command,

    /// Turn number when the command was applied (starts at 1).
    pub turn: u32,

    /// Sequence number within the turn.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, command: Command, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            command,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::TreasureType;

    #[test]
    fn test_action_costs() {
        let give = Command::GiveCard {
            giver: PlayerId(0),
            receiver: PlayerId(1),
            card: TreasureCard::Treasure(TreasureType::OceansChalice),
        };
        assert!(give.costs_action());
        assert!(Command::CaptureTreasure { player: PlayerId(0) }.costs_action());
        assert!(!Command::Discard {
            player: PlayerId(0),
            card: TreasureCard::Sandbags
        }
        .costs_action());
        assert!(!Command::AdvanceTurn.costs_action());
    }

    #[test]
    fn test_fly_target_keeps_passenger_order() {
        let target = SpecialTarget::fly(&[PlayerId(2), PlayerId(0)], TileId(4));
        match target {
            SpecialTarget::Fly { passengers, destination } => {
                assert_eq!(passengers.as_slice(), &[PlayerId(2), PlayerId(0)]);
                assert_eq!(destination, TileId(4));
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn test_record_serialization() {
        let command = Command::PlaySpecial {
            player: PlayerId(1),
            card: TreasureCard::HelicopterLift,
            target: SpecialTarget::fly(&[PlayerId(1)], TileId(3)),
        };
        let record = ActionRecord::new(PlayerId(1), command, 4, 2);

        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, back);
    }
}
