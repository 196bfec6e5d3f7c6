//! Turn/phase state machine and game-over evaluation.
//!
//! - `phase`: phases and per-turn counters
//! - `outcome`: win/loss evaluation
//! - `engine`: the `Game` value and every operation on it
//! - `setup`: builder and `new_game`
//! - `report`: what each operation did

pub mod engine;
pub mod outcome;
pub mod phase;
pub mod report;
pub mod setup;

pub use engine::{Game, TileView};
pub use outcome::{all_aboard, evaluate, GameOutcome, LossReason, OutcomeInputs};
pub use phase::{Phase, TurnState};
pub use report::{ActionReport, DrawReport, FloodEvent, FloodReport, Swim, TreasureDraw, TurnReport};
pub use setup::{new_game, GameBuilder, MAX_PLAYERS, MIN_PLAYERS};
