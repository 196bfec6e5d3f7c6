//! Save and restore a game exactly.
//!
//! A `Snapshot` is the whole `Game` as plain data, RNG position included, so
//! a restored game plays out identically to the original from that point.
//! `to_bytes`/`from_bytes` give a compact bincode form.

use serde::{Deserialize, Serialize};

use crate::board::{IslandGrid, TileId};
use crate::cards::{Deck, FloodCard, Treasure, TreasureCard, TreasureType};
use crate::core::action::ActionRecord;
use crate::core::config::{Difficulty, EngineConfig};
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::{GameRng, GameRngState};
use crate::roles::Adventurer;
use crate::rules::{Game, GameOutcome, Phase, TurnState, MAX_PLAYERS, MIN_PLAYERS};
use crate::water::WaterMeter;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete engine state as a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub config: EngineConfig,
    pub difficulty: Difficulty,
    pub grid: IslandGrid,
    pub treasure_deck: Deck<TreasureCard>,
    pub flood_deck: Deck<FloodCard>,
    pub meter: WaterMeter,
    pub players: PlayerMap<Adventurer>,
    pub treasures: Vec<Treasure>,
    pub active: PlayerId,
    pub phase: Phase,
    pub turn: TurnState,
    pub pending_discard: Option<PlayerId>,
    pub drowned: Option<PlayerId>,
    pub lifted_off: bool,
    pub outcome: Option<GameOutcome>,
    pub history: Vec<ActionRecord>,
    pub rng: GameRngState,
}

impl Snapshot {
    /// Encode with bincode.
    ///
    /// # Errors
    ///
    /// `EngineError::Snapshot` if encoding fails.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    ///
    /// # Errors
    ///
    /// `EngineError::Snapshot` for malformed input.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Cross-check references between the parts.
    fn validate(&self) -> Result<(), String> {
        if self.version != SNAPSHOT_VERSION {
            return Err(format!("unsupported snapshot version {}", self.version));
        }
        self.config.validate().map_err(|err| err.to_string())?;
        for (index, tile) in self.grid.all_tiles().iter().enumerate() {
            if tile.id.index() != index {
                return Err(format!("{} recorded in arena slot {index}", tile.id));
            }
        }
        let known = |tile: TileId| self.grid.get(tile).is_some();
        if !known(self.grid.escape_tile()) {
            return Err(format!("escape tile {} is not on the board", self.grid.escape_tile()));
        }
        let deck = &self.flood_deck;
        if let Some(card) = deck
            .draw_pile()
            .iter()
            .chain(deck.discard_pile())
            .chain(deck.removed())
            .find(|card| !known(card.tile()))
        {
            return Err(format!("flood card names unknown {}", card.tile()));
        }
        if let Some(treasure) = self.treasures.iter().find(|t| !t.sites.iter().all(|&s| known(s))) {
            return Err(format!("{} has a site off the board", treasure.kind));
        }
        let count = self.players.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(format!("{count} players recorded"));
        }
        for player in [Some(self.active), self.pending_discard, self.drowned]
            .into_iter()
            .flatten()
        {
            if !self.players.contains(player) {
                return Err(format!("{player} is not seated"));
            }
        }
        for (id, adventurer) in self.players.iter() {
            if let Some(tile) = adventurer.tile() {
                if self.grid.get(tile).is_none() {
                    return Err(format!("{id} stands on unknown {tile}"));
                }
            }
        }
        for kind in TreasureType::ALL {
            if !self.treasures.iter().any(|t| t.kind == kind) {
                return Err(format!("no record for {kind}"));
            }
        }
        Ok(())
    }
}

impl Game {
    /// Capture the full state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            difficulty: self.difficulty,
            grid: self.grid.clone(),
            treasure_deck: self.treasure_deck.clone(),
            flood_deck: self.flood_deck.clone(),
            meter: self.meter,
            players: self.players.clone(),
            treasures: self.treasures.clone(),
            active: self.active,
            phase: self.phase,
            turn: self.turn,
            pending_discard: self.pending_discard,
            drowned: self.drowned,
            lifted_off: self.lifted_off,
            outcome: self.outcome,
            history: self.history.iter().cloned().collect(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild a game from a snapshot.
    ///
    /// # Errors
    ///
    /// `EngineError::Snapshot` when the parts do not fit together.
    pub fn restore(snapshot: Snapshot) -> EngineResult<Game> {
        snapshot.validate().map_err(|reason| {
            log::warn!("rejected snapshot: {reason}");
            EngineError::Snapshot(reason)
        })?;
        Ok(Game {
            config: snapshot.config,
            difficulty: snapshot.difficulty,
            grid: snapshot.grid,
            treasure_deck: snapshot.treasure_deck,
            flood_deck: snapshot.flood_deck,
            meter: snapshot.meter,
            players: snapshot.players,
            treasures: snapshot.treasures,
            active: snapshot.active,
            phase: snapshot.phase,
            turn: snapshot.turn,
            pending_discard: snapshot.pending_discard,
            drowned: snapshot.drowned,
            lifted_off: snapshot.lifted_off,
            outcome: snapshot.outcome,
            history: snapshot.history.into_iter().collect(),
            rng: GameRng::from_state(&snapshot.rng),
        })
    }
}
