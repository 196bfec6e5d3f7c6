//! # sinking-isle
//!
//! Rule engine for a cooperative sinking-island board game. Two to four
//! adventurers move across a shrinking island of 24 tiles, shore up flooded
//! ground, trade cards and capture four treasures, then escape by helicopter
//! from Fools' Landing before the sea takes it.
//!
//! ## Design Principles
//!
//! 1. **One value, no hidden state**: a `Game` owns the board, decks, water
//!    meter, players and RNG. Clone it to explore, snapshot it to save.
//!
//! 2. **Roles are data**: every role exception (diagonal steps, flight,
//!    swimming, double shore-up, remote trading, directing others) is a row
//!    in the capability table, read by one movement resolver.
//!
//! 3. **Deterministic**: all randomness comes from a seeded ChaCha8 stream,
//!    so a seed plus the command history reproduces a game exactly.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, commands, errors
//! - `board`: tiles, flood states and the island grid
//! - `cards`: treasure and flood decks, treasure capture state
//! - `water`: the water meter
//! - `roles`: adventurer records and the role capability table
//! - `movement`: move, shore-up, navigation and swim legality
//! - `rules`: turn phases, game-over evaluation, the `Game` engine
//! - `snapshot`: exact save/restore
//!
//! ## Example
//!
//! ```
//! use sinking_isle::{new_game, Difficulty, Phase};
//!
//! let mut game = new_game(&["Ann", "Bo"], Difficulty::Novice, 7).unwrap();
//! assert_eq!(game.phase(), Phase::Action);
//!
//! let report = game.advance_turn().unwrap();
//! assert_eq!(report.treasure_draws.len(), 2);
//! assert!(game.is_game_over() || game.turn_number() == 2);
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod movement;
pub mod roles;
pub mod rules;
pub mod snapshot;
pub mod water;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, Command, Difficulty, DiscardPolicy, EngineConfig, EngineError, EngineResult, GameRng,
    GameRngState, InvariantError, PlayerId, PlayerMap, PreconditionError, RuleViolation, SpecialTarget,
};

pub use crate::board::{Adjacency, Coord, FloodState, IslandGrid, Layout, Tile, TileId, ESCAPE_TILE};

pub use crate::cards::{Deck, FloodCard, Treasure, TreasureCard, TreasureType};

pub use crate::water::{WaterMeter, MAX_WATER_LEVEL};

pub use crate::roles::{Adventurer, Role, RoleCapabilities};

pub use crate::rules::{
    new_game, ActionReport, DrawReport, FloodEvent, FloodReport, Game, GameBuilder, GameOutcome, LossReason,
    Phase, Swim, TileView, TreasureDraw, TurnReport,
};

pub use crate::snapshot::{Snapshot, SNAPSHOT_VERSION};
