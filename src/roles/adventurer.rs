//! Per-player record: role, position, hand and turn-scoped trackers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::capability::{Role, RoleCapabilities};
use crate::board::TileId;
use crate::cards::{TreasureCard, TreasureType};

/// One player on the island.
///
/// The turn trackers (`flight_used`, the Engineer's bonus shore-up) live
/// here and are cleared by `reset_turn` when the turn passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventurer {
    pub name: String,
    pub role: Role,
    tile: Option<TileId>,
    /// Insertion order is kept; the automatic discard relies on it.
    hand: Vec<TreasureCard>,
    collected: SmallVec<[TreasureType; 4]>,
    flight_used: bool,
    /// Free shore-ups left in the current action.
    bonus_shore_ups: u8,
}

impl Adventurer {
    /// A new adventurer, not yet on the board.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            tile: None,
            hand: Vec::new(),
            collected: SmallVec::new(),
            flight_used: false,
            bonus_shore_ups: 0,
        }
    }

    #[must_use]
    pub fn capabilities(&self) -> &'static RoleCapabilities {
        self.role.capabilities()
    }

    // === Position ===

    #[must_use]
    pub fn tile(&self) -> Option<TileId> {
        self.tile
    }

    pub fn place(&mut self, tile: TileId) {
        self.tile = Some(tile);
    }

    // === Hand ===

    #[must_use]
    pub fn hand(&self) -> &[TreasureCard] {
        &self.hand
    }

    pub fn add_card(&mut self, card: TreasureCard) {
        self.hand.push(card);
    }

    /// Remove the most recently added copy of `card`.
    pub fn remove_card(&mut self, card: TreasureCard) -> bool {
        match self.hand.iter().rposition(|&c| c == card) {
            Some(index) => {
                self.hand.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn holds(&self, card: TreasureCard) -> bool {
        self.hand.contains(&card)
    }

    /// Matching cards held for a treasure.
    #[must_use]
    pub fn treasure_cards(&self, kind: TreasureType) -> u8 {
        let count = self
            .hand
            .iter()
            .filter(|&&c| c == TreasureCard::Treasure(kind))
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// The card the automatic fallback would discard: the last-added
    /// non-special card, else the last-added special card.
    #[must_use]
    pub fn auto_discard_choice(&self) -> Option<TreasureCard> {
        self.hand
            .iter()
            .rev()
            .find(|c| !c.is_special())
            .or_else(|| self.hand.last())
            .copied()
    }

    // === Treasures ===

    #[must_use]
    pub fn collected(&self) -> &[TreasureType] {
        &self.collected
    }

    pub fn collect(&mut self, kind: TreasureType) {
        if !self.collected.contains(&kind) {
            self.collected.push(kind);
        }
    }

    // === Turn trackers ===

    #[must_use]
    pub fn flight_used(&self) -> bool {
        self.flight_used
    }

    pub fn use_flight(&mut self) {
        self.flight_used = true;
    }

    /// A free shore-up is available in the current action.
    #[must_use]
    pub fn may_shore_up_again(&self) -> bool {
        self.bonus_shore_ups > 0
    }

    /// Start an action's free shore-ups (the role's count minus the one
    /// just paid for).
    pub fn open_bonus_shore_ups(&mut self) {
        self.bonus_shore_ups = self.capabilities().shore_ups_per_action.saturating_sub(1);
    }

    /// Spend a free shore-up. Returns false if none was left.
    pub fn take_bonus_shore_up(&mut self) -> bool {
        if self.bonus_shore_ups == 0 {
            return false;
        }
        self.bonus_shore_ups -= 1;
        true
    }

    /// End the current action's free shore-ups.
    pub fn close_bonus_shore_ups(&mut self) {
        self.bonus_shore_ups = 0;
    }

    /// Clear every turn-scoped tracker.
    pub fn reset_turn(&mut self) {
        self.flight_used = false;
        self.bonus_shore_ups = 0;
    }
}
