//! Engine configuration.
//!
//! Balance constants that are not fixed by a lookup table live here, along
//! with the two rule policies the engine lets callers choose:
//!
//! - whether winning requires a Helicopter Lift played as lift-off
//! - whether hand-limit discards wait for the caller or resolve at once

use serde::{Deserialize, Serialize};

use super::error::PreconditionError;
use crate::board::TILE_DEFS;

/// Starting difficulty; selects the initial water level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Novice,
    #[default]
    Normal,
    Elite,
    Legendary,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Novice,
        Difficulty::Normal,
        Difficulty::Elite,
        Difficulty::Legendary,
    ];

    /// Water level the meter starts at.
    #[must_use]
    pub const fn starting_water_level(self) -> u8 {
        match self {
            Difficulty::Novice => 1,
            Difficulty::Normal => 2,
            Difficulty::Elite => 3,
            Difficulty::Legendary => 4,
        }
    }
}

/// How hand-limit overflow is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardPolicy {
    /// Pause and wait for `discard_card`; advancing without a choice falls
    /// back to the automatic rule.
    #[default]
    CallerDirected,
    /// Apply the automatic rule immediately.
    Automatic,
}

/// Tunable rule constants for one game.
///
/// ```
/// use sinking_isle::core::{DiscardPolicy, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_require_lift_off(false)
///     .with_discard_policy(DiscardPolicy::Automatic);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.actions_per_turn, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Action points each adventurer gets per turn.
    pub actions_per_turn: u8,

    /// Cards an adventurer may hold at the end of any operation.
    pub hand_limit: usize,

    /// Treasure cards drawn in the draw-treasure phase.
    pub treasure_draws_per_turn: u8,

    /// Treasure cards dealt to each adventurer during setup.
    pub initial_hand_size: u8,

    /// Flood cards drawn during setup.
    pub initial_flood_draws: u8,

    /// Winning needs a Helicopter Lift played as lift-off.
    pub require_lift_off: bool,

    /// Hand-limit overflow handling.
    pub discard_policy: DiscardPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actions_per_turn: 3,
            hand_limit: 5,
            treasure_draws_per_turn: 2,
            initial_hand_size: 2,
            initial_flood_draws: 6,
            require_lift_off: true,
            discard_policy: DiscardPolicy::CallerDirected,
        }
    }
}

impl EngineConfig {
    /// Set whether lift-off is required to win.
    #[must_use]
    pub fn with_require_lift_off(mut self, required: bool) -> Self {
        self.require_lift_off = required;
        self
    }

    /// Set the hand-limit discard policy.
    #[must_use]
    pub fn with_discard_policy(mut self, policy: DiscardPolicy) -> Self {
        self.discard_policy = policy;
        self
    }

    /// Set the number of setup flood draws.
    #[must_use]
    pub fn with_initial_flood_draws(mut self, draws: u8) -> Self {
        self.initial_flood_draws = draws;
        self
    }

    /// Set the number of treasure cards dealt during setup.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: u8) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Check the configuration can drive a game.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if self.actions_per_turn == 0 {
            return Err(PreconditionError::InvalidConfig("actions_per_turn must be positive"));
        }
        if self.hand_limit == 0 {
            return Err(PreconditionError::InvalidConfig("hand_limit must be positive"));
        }
        if usize::from(self.initial_hand_size) > self.hand_limit {
            return Err(PreconditionError::InvalidConfig(
                "initial_hand_size exceeds hand_limit",
            ));
        }
        // Four full hands must fit in the 25 non-Waters-Rise cards.
        if self.initial_hand_size > 6 {
            return Err(PreconditionError::InvalidConfig("initial_hand_size exceeds 6"));
        }
        if usize::from(self.initial_flood_draws) > TILE_DEFS.len() {
            return Err(PreconditionError::InvalidConfig(
                "initial_flood_draws exceeds the flood deck",
            ));
        }
        Ok(())
    }
}
