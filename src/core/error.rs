//! Error taxonomy for engine operations.
//!
//! Three categories, kept apart so a front end can tell them apart:
//!
//! - [`RuleViolation`]: the move is not allowed by the game rules. Expected
//!   and frequent; front ends probe legality with it.
//! - [`PreconditionError`]: the call itself is malformed or out of turn
//!   (unknown player, wrong phase, game already over).
//! - [`InvariantError`]: the engine reached a state its own state machine
//!   should make impossible. Logged at `error!` when raised.
//!
//! Ending the game is not an error; see [`crate::rules::GameOutcome`].

use thiserror::Error;

use crate::board::TileId;
use crate::cards::{TreasureCard, TreasureType};
use crate::core::player::PlayerId;
use crate::roles::Role;
use crate::rules::Phase;

/// An attempted action that the rules forbid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("{0} has sunk")]
    TileSunk(TileId),
    #[error("{target} is out of reach from {from}")]
    OutOfReach { from: TileId, target: TileId },
    #[error("flight already used this turn")]
    FlightUsed,
    #[error("{0} is not flooded")]
    NotFlooded(TileId),
    #[error("no actions remaining")]
    NoActionsRemaining,
    #[error("{giver} and {receiver} are not on the same tile")]
    NotOnSameTile { giver: PlayerId, receiver: PlayerId },
    #[error("an adventurer cannot target themselves")]
    SelfTarget,
    #[error("{card} is not in {player}'s hand")]
    CardNotInHand { player: PlayerId, card: TreasureCard },
    #[error("{0} cannot be given away")]
    NotTradable(TreasureCard),
    #[error("{0} is not a special card")]
    NotSpecialCard(TreasureCard),
    #[error("{0} holds no treasure")]
    NoTreasureHere(TileId),
    #[error("{0} has already been captured")]
    TreasureAlreadyCaptured(TreasureType),
    #[error("{treasure} needs {needed} matching cards ({held} held)")]
    NotEnoughTreasureCards {
        treasure: TreasureType,
        needed: u8,
        held: u8,
    },
    #[error("{0} cannot direct other adventurers")]
    CannotNavigate(Role),
    #[error("no passengers selected")]
    NoPassengers,
    #[error("helicopter passengers must share a tile")]
    PassengersSplit,
    #[error("passengers are already on {0}")]
    AlreadyThere(TileId),
    #[error("target does not fit {0}")]
    TargetMismatch(TreasureCard),
    #[error("lift-off needs every treasure and every adventurer on the escape tile")]
    LiftOffNotReady,
}

/// The call is invalid in the current engine state, independent of rules.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("the game is over")]
    GameOver,
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("unknown tile {0}")]
    UnknownTile(TileId),
    #[error("{player} is not the active player ({active} is)")]
    NotActivePlayer { player: PlayerId, active: PlayerId },
    #[error("operation needs the {expected:?} phase, engine is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("{0} has no current tile")]
    PlayerNotPlaced(PlayerId),
    #[error("{0} must discard down to the hand limit first")]
    DiscardPending(PlayerId),
    #[error("{0} is not over the hand limit")]
    NoDiscardPending(PlayerId),
    #[error("player count {0} is outside 2..=4")]
    InvalidPlayerCount(usize),
    #[error("{0} is assigned to more than one adventurer")]
    DuplicateRole(Role),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(&'static str),
}

/// The engine's own bookkeeping is inconsistent. Treat as a defect.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("{0} was flooded after it sank")]
    FloodSunkTile(TileId),
    #[error("no tile named {0:?} on the board")]
    MissingTile(String),
    #[error("{0} deck has no cards anywhere in the game")]
    DeckExhausted(&'static str),
}

impl InvariantError {
    /// Log the violation loudly and hand it back for propagation.
    #[must_use]
    pub fn logged(self) -> Self {
        log::error!("invariant violated: {self}");
        self
    }
}

/// Any failure an engine operation can report.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),
    #[error("snapshot codec: {0}")]
    Snapshot(String),
}

impl EngineError {
    /// True for ordinary "the rules say no" failures.
    #[must_use]
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, EngineError::Rule(_))
    }

    /// True for "you can't do that right now / malformed call" failures.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, EngineError::Precondition(_))
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_distinct() {
        let rule: EngineError = RuleViolation::NoActionsRemaining.into();
        let pre: EngineError = PreconditionError::GameOver.into();
        let inv: EngineError = InvariantError::DeckExhausted("flood").into();

        assert!(rule.is_rule_violation() && !rule.is_precondition());
        assert!(pre.is_precondition() && !pre.is_rule_violation());
        assert!(!inv.is_rule_violation() && !inv.is_precondition());
    }

    #[test]
    fn test_messages() {
        let err = RuleViolation::NotEnoughTreasureCards {
            treasure: TreasureType::EarthStone,
            needed: 4,
            held: 2,
        };
        assert_eq!(err.to_string(), "The Earth Stone needs 4 matching cards (2 held)");

        let err: EngineError = PreconditionError::UnknownPlayer(PlayerId(7)).into();
        assert_eq!(err.to_string(), "precondition failed: unknown player Player 7");
    }
}
