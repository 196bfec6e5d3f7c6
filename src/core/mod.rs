//! Core engine types: players, RNG, configuration, commands, errors.
//!
//! These are the building blocks every other module leans on. None of them
//! know about tiles, decks or roles beyond naming their identifiers.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{ActionRecord, Command, SpecialTarget};
pub use config::{Difficulty, DiscardPolicy, EngineConfig};
pub use error::{EngineError, EngineResult, InvariantError, PreconditionError, RuleViolation};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
