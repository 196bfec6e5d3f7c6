//! Movement and shore-up legality.
//!
//! All functions are pure over the grid and a `Mover`. The engine resolves
//! the acting player to a `Mover` (failing with a precondition error when the
//! player is not on the board) and applies whatever these functions allow.

use crate::board::{IslandGrid, TileId};
use crate::core::error::RuleViolation;
use crate::roles::{Adventurer, MovementMode, RoleCapabilities};

use super::search::{swim_reach, walk_reach};

/// Steps the Navigator may move another adventurer.
pub const NAVIGATOR_STEPS: u8 = 2;

/// An adventurer's movement context.
#[derive(Clone, Copy, Debug)]
pub struct Mover<'a> {
    pub from: TileId,
    pub caps: &'a RoleCapabilities,
    /// The once-per-turn flight has not been spent.
    pub can_fly: bool,
}

impl<'a> Mover<'a> {
    /// `None` when the adventurer has no current tile.
    #[must_use]
    pub fn of(adventurer: &'a Adventurer) -> Option<Self> {
        Some(Self {
            from: adventurer.tile()?,
            caps: adventurer.capabilities(),
            can_fly: !adventurer.flight_used(),
        })
    }

    /// Same tile, or adjacent under the role's adjacency.
    #[must_use]
    pub fn within_reach(&self, grid: &IslandGrid, target: TileId) -> bool {
        target == self.from || grid.are_adjacent(self.from, target, self.caps.adjacency)
    }
}

/// How a legal move is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Stay put or step to an adjacent tile.
    Step,
    /// The Pilot's once-per-turn flight.
    Flight,
    /// The Diver's passage through water.
    Swim,
}

/// Check a move and say how it would be made.
///
/// # Errors
///
/// `TileSunk` for a sunk target; `FlightUsed` when only a spent flight would
/// reach it; `OutOfReach` otherwise.
pub fn check_move(grid: &IslandGrid, mover: &Mover<'_>, target: TileId) -> Result<MoveKind, RuleViolation> {
    if grid.is_sunk(target) {
        return Err(RuleViolation::TileSunk(target));
    }
    if mover.within_reach(grid, target) {
        return Ok(MoveKind::Step);
    }
    match mover.caps.movement {
        MovementMode::FlyOncePerTurn if mover.can_fly => Ok(MoveKind::Flight),
        MovementMode::FlyOncePerTurn => Err(RuleViolation::FlightUsed),
        MovementMode::Swim if swim_reach(grid, mover.from).iter().any(|&(id, _)| id == target) => {
            Ok(MoveKind::Swim)
        }
        MovementMode::Swim | MovementMode::Walk => Err(RuleViolation::OutOfReach {
            from: mover.from,
            target,
        }),
    }
}

/// Every tile the mover could move to, in id order, excluding the current
/// tile.
#[must_use]
pub fn legal_moves(grid: &IslandGrid, mover: &Mover<'_>) -> Vec<TileId> {
    grid.active_tiles()
        .map(|t| t.id)
        .filter(|&id| id != mover.from && check_move(grid, mover, id).is_ok())
        .collect()
}

/// Check a shore-up target.
///
/// # Errors
///
/// `TileSunk`, `NotFlooded`, or `OutOfReach` when the target is neither the
/// current tile nor adjacent under the role's adjacency.
pub fn check_shore_up(grid: &IslandGrid, mover: &Mover<'_>, target: TileId) -> Result<(), RuleViolation> {
    if grid.is_sunk(target) {
        return Err(RuleViolation::TileSunk(target));
    }
    if !grid.is_flooded(target) {
        return Err(RuleViolation::NotFlooded(target));
    }
    if !mover.within_reach(grid, target) {
        return Err(RuleViolation::OutOfReach {
            from: mover.from,
            target,
        });
    }
    Ok(())
}

/// Flooded tiles the mover could shore up, in id order.
#[must_use]
pub fn shore_up_targets(grid: &IslandGrid, mover: &Mover<'_>) -> Vec<TileId> {
    grid.active_tiles()
        .filter(|t| t.is_flooded())
        .map(|t| t.id)
        .filter(|&id| mover.within_reach(grid, id))
        .collect()
}

/// Tiles another adventurer can be directed to, in id order.
#[must_use]
pub fn navigation_targets(grid: &IslandGrid, traveller: &Mover<'_>) -> Vec<TileId> {
    let mut targets = walk_reach(grid, traveller.from, traveller.caps.adjacency, NAVIGATOR_STEPS);
    targets.sort_unstable();
    targets
}

/// Where an adventurer on a sinking tile may swim to, best first.
///
/// Fliers may go anywhere still in play, divers to the nearest tiles their
/// swim reaches, everyone else to an adjacent tile. Ties are broken by
/// distance, then row-major position. Empty means the adventurer drowns.
#[must_use]
pub fn swim_destinations(grid: &IslandGrid, caps: &RoleCapabilities, from: TileId) -> Vec<TileId> {
    let Some(origin) = grid.get(from).map(|t| t.coord) else {
        return Vec::new();
    };
    let coord_of = |id: TileId| grid.get(id).map(|t| t.coord).unwrap_or(origin);

    let mut ranked: Vec<(u8, TileId)> = match caps.movement {
        MovementMode::FlyOncePerTurn => grid
            .active_tiles()
            .map(|t| (origin.manhattan(t.coord), t.id))
            .collect(),
        MovementMode::Swim => {
            let reach = swim_reach(grid, from);
            let nearest = reach.iter().map(|&(_, d)| d).min().unwrap_or(0);
            reach
                .into_iter()
                .filter(|&(_, d)| d == nearest)
                .map(|(id, d)| (d, id))
                .collect()
        }
        MovementMode::Walk => grid
            .neighbors(from, caps.adjacency)
            .into_iter()
            .map(|id| (origin.manhattan(coord_of(id)), id))
            .collect(),
    };

    ranked.sort_by_key(|&(distance, id)| (distance, coord_of(id)));
    ranked.into_iter().map(|(_, id)| id).collect()
}
