//! Movement and shore-up resolver.
//!
//! - `search`: breadth-first reach over the board (Diver swims, Navigator
//!   steps)
//! - `resolver`: legality checks and candidate lists for moves, shore-ups
//!   and emergency swims

pub mod resolver;
pub mod search;

pub use resolver::{
    check_move, check_shore_up, legal_moves, navigation_targets, shore_up_targets,
    swim_destinations, MoveKind, Mover, NAVIGATOR_STEPS,
};
pub use search::{swim_reach, walk_reach};
