//! Game setup: the builder and the `new_game` shortcut.

use super::engine::Game;
use super::phase::{Phase, TurnState};
use crate::board::{standard_island, IslandGrid, Layout, TileId};
use crate::cards::{flood_cards_for, standard_treasure_cards, treasures_for, Deck, TreasureCard};
use crate::core::config::{Difficulty, EngineConfig};
use crate::core::error::{EngineResult, InvariantError, PreconditionError};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::roles::{Adventurer, Role};
use crate::water::WaterMeter;

/// Smallest and largest supported party.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Start a standard game: shuffled island, random roles, two cards each and
/// six flooded tiles.
///
/// ```
/// use sinking_isle::core::Difficulty;
/// use sinking_isle::rules::new_game;
///
/// let game = new_game(&["Ann", "Bo", "Cy"], Difficulty::Normal, 42).unwrap();
/// assert_eq!(game.player_count(), 3);
/// assert_eq!(game.water_level(), 2);
/// assert!(game.players().all(|(_, a)| a.hand().len() == 2));
/// ```
///
/// # Errors
///
/// `InvalidPlayerCount` outside 2..=4.
pub fn new_game(player_names: &[&str], difficulty: Difficulty, seed: u64) -> EngineResult<Game> {
    GameBuilder::new(seed)
        .players(player_names.iter().copied())
        .difficulty(difficulty)
        .build()
}

/// Builder for a `Game`.
///
/// Everything random is driven by the seed, so the same builder always
/// produces the same game.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    seed: u64,
    difficulty: Difficulty,
    config: EngineConfig,
    layout: Layout,
    players: Vec<(String, Option<Role>)>,
}

impl GameBuilder {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            difficulty: Difficulty::default(),
            config: EngineConfig::default(),
            layout: Layout::default(),
            players: Vec::new(),
        }
    }

    /// Add an adventurer whose role is drawn at random.
    #[must_use]
    pub fn player(mut self, name: impl Into<String>) -> Self {
        self.players.push((name.into(), None));
        self
    }

    /// Add an adventurer with a fixed role.
    #[must_use]
    pub fn player_with_role(mut self, name: impl Into<String>, role: Role) -> Self {
        self.players.push((name.into(), Some(role)));
        self
    }

    #[must_use]
    pub fn players<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players
            .extend(names.into_iter().map(|name| (name.into(), None)));
        self
    }

    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Start with every tile dry.
    #[must_use]
    pub fn skip_initial_flood(mut self) -> Self {
        self.config.initial_flood_draws = 0;
        self
    }

    /// Build the game and run setup.
    ///
    /// # Errors
    ///
    /// `InvalidPlayerCount`, `DuplicateRole`, or `InvalidConfig`.
    pub fn build(self) -> EngineResult<Game> {
        self.config.validate()?;
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(PreconditionError::InvalidPlayerCount(count).into());
        }
        let mut fixed: Vec<Role> = Vec::with_capacity(count);
        for role in self.players.iter().filter_map(|(_, role)| *role) {
            if fixed.contains(&role) {
                return Err(PreconditionError::DuplicateRole(role).into());
            }
            fixed.push(role);
        }

        let mut rng = GameRng::new(self.seed);
        let grid = standard_island(self.layout, &mut rng)?;

        let mut open_roles: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| !fixed.contains(role))
            .collect();
        rng.shuffle(&mut open_roles);
        let mut open_roles = open_roles.into_iter();

        let mut adventurers = Vec::with_capacity(count);
        for (name, role) in self.players {
            let role = match role {
                Some(role) => role,
                None => open_roles
                    .next()
                    .ok_or(PreconditionError::InvalidPlayerCount(count))?,
            };
            let mut adventurer = Adventurer::new(name, role);
            adventurer.place(start_tile(&grid, role)?);
            adventurers.push(adventurer);
        }
        let mut players = PlayerMap::from_vec(adventurers);

        let treasures = treasures_for(&grid)?;
        let mut treasure_deck = Deck::shuffled(standard_treasure_cards(), &mut rng);
        deal(&mut treasure_deck, &mut players, self.config.initial_hand_size, &mut rng)?;
        let flood_deck = Deck::shuffled(flood_cards_for(&grid), &mut rng);

        let mut game = Game {
            turn: TurnState::first(self.config.actions_per_turn),
            config: self.config,
            difficulty: self.difficulty,
            grid,
            treasure_deck,
            flood_deck,
            meter: WaterMeter::new(self.difficulty.starting_water_level()),
            players,
            treasures,
            active: PlayerId(0),
            phase: Phase::Action,
            pending_discard: None,
            drowned: None,
            lifted_off: false,
            outcome: None,
            history: im::Vector::new(),
            rng,
        };
        let draws = game.config.initial_flood_draws;
        game.initial_flood(draws)?;

        log::info!(
            "new game: {count} adventurers, {:?}, water level {}, seed {}",
            game.difficulty,
            game.water_level(),
            game.seed()
        );
        Ok(game)
    }
}

fn start_tile(grid: &IslandGrid, role: Role) -> Result<TileId, InvariantError> {
    grid.all_tiles()
        .iter()
        .find(|tile| tile.start_for == Some(role))
        .map(|tile| tile.id)
        .ok_or_else(|| InvariantError::MissingTile(format!("start tile for {role}")).logged())
}

/// Deal opening hands. Waters Rise cards met along the way are set aside,
/// then returned and the draw pile reshuffled.
fn deal(
    deck: &mut Deck<TreasureCard>,
    players: &mut PlayerMap<Adventurer>,
    hand_size: u8,
    rng: &mut GameRng,
) -> Result<(), InvariantError> {
    let mut set_aside = Vec::new();
    for (_, adventurer) in players.iter_mut() {
        let mut dealt = 0;
        while dealt < hand_size {
            let card = deck
                .draw(rng)
                .ok_or_else(|| InvariantError::DeckExhausted("treasure").logged())?;
            if card == TreasureCard::WatersRise {
                set_aside.push(card);
                continue;
            }
            adventurer.add_card(card);
            dealt += 1;
        }
    }
    if !set_aside.is_empty() {
        log::debug!("returning {} Waters Rise cards dealt during setup", set_aside.len());
        for card in set_aside {
            deck.place_on_top(card);
        }
        deck.shuffle_draw_pile(rng);
    }
    Ok(())
}
