//! Roles and their capability descriptors.
//!
//! Every rule exception a role enjoys is a field on `RoleCapabilities`.
//! The movement resolver and the engine read these fields; nothing else in
//! the crate matches on `Role`.

use serde::{Deserialize, Serialize};

use crate::board::Adjacency;

/// Adventurer roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Pilot,
    Explorer,
    Engineer,
    Diver,
    Messenger,
    Navigator,
}

impl Role {
    /// Every role, in the order the descriptor table lists them.
    pub const ALL: [Role; 6] = [
        Role::Pilot,
        Role::Explorer,
        Role::Engineer,
        Role::Diver,
        Role::Messenger,
        Role::Navigator,
    ];

    /// The role's capability descriptor.
    #[must_use]
    pub fn capabilities(self) -> &'static RoleCapabilities {
        &CAPABILITIES[self as usize]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Role::Pilot => "Pilot",
            Role::Explorer => "Explorer",
            Role::Engineer => "Engineer",
            Role::Diver => "Diver",
            Role::Messenger => "Messenger",
            Role::Navigator => "Navigator",
        })
    }
}

/// How a role moves beyond ordinary adjacent steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// Adjacent steps only.
    Walk,
    /// Once per turn, to any tile still in play.
    FlyOncePerTurn,
    /// Through flooded and sunk tiles to any tile reached that way.
    Swim,
}

/// Who a role can hand treasure cards to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeReach {
    SameTile,
    Anywhere,
}

/// Rule-affecting attributes of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCapabilities {
    /// Neighbour rule for moving and shoring up.
    pub adjacency: Adjacency,
    pub movement: MovementMode,
    /// Tiles shored up for one action point.
    pub shore_ups_per_action: u8,
    /// Matching treasure cards needed to capture.
    pub capture_threshold: u8,
    pub exchange: ExchangeReach,
    /// May spend actions moving other adventurers.
    pub directs_others: bool,
}

const BASE: RoleCapabilities = RoleCapabilities {
    adjacency: Adjacency::Orthogonal,
    movement: MovementMode::Walk,
    shore_ups_per_action: 1,
    capture_threshold: 4,
    exchange: ExchangeReach::SameTile,
    directs_others: false,
};

/// Indexed by `Role as usize`.
const CAPABILITIES: [RoleCapabilities; 6] = [
    // Pilot
    RoleCapabilities {
        movement: MovementMode::FlyOncePerTurn,
        ..BASE
    },
    // Explorer
    RoleCapabilities {
        adjacency: Adjacency::WithDiagonals,
        ..BASE
    },
    // Engineer
    RoleCapabilities {
        shore_ups_per_action: 2,
        ..BASE
    },
    // Diver
    RoleCapabilities {
        movement: MovementMode::Swim,
        ..BASE
    },
    // Messenger
    RoleCapabilities {
        exchange: ExchangeReach::Anywhere,
        ..BASE
    },
    // Navigator
    RoleCapabilities {
        directs_others: true,
        ..BASE
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_role_has_one_exception() {
        for role in Role::ALL {
            let caps = role.capabilities();
            let exceptions = [
                caps.adjacency != BASE.adjacency,
                caps.movement != BASE.movement,
                caps.shore_ups_per_action != BASE.shore_ups_per_action,
                caps.exchange != BASE.exchange,
                caps.directs_others != BASE.directs_others,
            ];
            assert_eq!(exceptions.iter().filter(|&&e| e).count(), 1, "{role}");
        }
    }

    #[test]
    fn test_table_matches_roles() {
        assert_eq!(Role::Pilot.capabilities().movement, MovementMode::FlyOncePerTurn);
        assert_eq!(Role::Explorer.capabilities().adjacency, Adjacency::WithDiagonals);
        assert_eq!(Role::Engineer.capabilities().shore_ups_per_action, 2);
        assert_eq!(Role::Diver.capabilities().movement, MovementMode::Swim);
        assert_eq!(Role::Messenger.capabilities().exchange, ExchangeReach::Anywhere);
        assert!(Role::Navigator.capabilities().directs_others);
        assert!(Role::ALL.iter().all(|r| r.capabilities().capture_threshold == 4));
    }
}
