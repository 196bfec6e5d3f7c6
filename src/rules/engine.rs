//! The game engine: one `Game` value owning every piece of state.
//!
//! Every mutating operation validates fully before it changes anything, so
//! a rejected call leaves the game untouched. Accepted operations are
//! appended to the history and followed by a game-over check; once an
//! outcome is latched every mutation fails with `PreconditionError::GameOver`.

use im::Vector;
use smallvec::SmallVec;

use super::outcome::{all_aboard, evaluate, GameOutcome, OutcomeInputs};
use super::phase::{Phase, TurnState};
use super::report::{ActionReport, DrawReport, FloodEvent, FloodReport, Swim, TreasureDraw, TurnReport};
use crate::board::{Coord, FloodState, IslandGrid, TileId};
use crate::cards::{Deck, FloodCard, Treasure, TreasureCard, TreasureType};
use crate::core::action::{ActionRecord, Command, SpecialTarget};
use crate::core::config::{Difficulty, DiscardPolicy, EngineConfig};
use crate::core::error::{EngineResult, InvariantError, PreconditionError, RuleViolation};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::movement::{
    check_move, check_shore_up, legal_moves, navigation_targets, shore_up_targets, swim_destinations,
    MoveKind, Mover,
};
use crate::roles::{Adventurer, ExchangeReach};
use crate::water::WaterMeter;

/// Read-only view of one tile for front ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileView {
    pub id: TileId,
    pub name: String,
    pub coord: Coord,
    pub state: FloodState,
    pub treasure: Option<TreasureType>,
    pub occupants: SmallVec<[PlayerId; 4]>,
}

/// Where in the history the next accepted command lands.
#[derive(Clone, Copy, Debug)]
struct Stamp {
    player: PlayerId,
    turn: u32,
    sequence: u32,
}

/// A game in progress (or finished).
///
/// Build one with [`crate::rules::new_game`] or [`crate::rules::GameBuilder`].
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) config: EngineConfig,
    pub(crate) difficulty: Difficulty,
    pub(crate) grid: IslandGrid,
    pub(crate) treasure_deck: Deck<TreasureCard>,
    pub(crate) flood_deck: Deck<FloodCard>,
    pub(crate) meter: WaterMeter,
    pub(crate) players: PlayerMap<Adventurer>,
    pub(crate) treasures: Vec<Treasure>,
    pub(crate) active: PlayerId,
    pub(crate) phase: Phase,
    pub(crate) turn: TurnState,
    pub(crate) pending_discard: Option<PlayerId>,
    /// First adventurer who had nowhere to swim.
    pub(crate) drowned: Option<PlayerId>,
    pub(crate) lifted_off: bool,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) history: Vector<ActionRecord>,
    pub(crate) rng: GameRng,
}

impl Game {
    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn.number
    }

    #[must_use]
    pub fn actions_remaining(&self) -> u8 {
        self.turn.actions_remaining
    }

    #[must_use]
    pub fn grid(&self) -> &IslandGrid {
        &self.grid
    }

    /// Every tile ever placed, sunk ones included, in id order.
    #[must_use]
    pub fn tiles(&self) -> Vec<TileView> {
        self.grid
            .all_tiles()
            .iter()
            .map(|tile| TileView {
                id: tile.id,
                name: tile.name.clone(),
                coord: tile.coord,
                state: tile.state,
                treasure: tile.treasure,
                occupants: self.occupants(tile.id),
            })
            .collect()
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<TileView> {
        let tile = self.grid.get(id)?;
        Some(TileView {
            id,
            name: tile.name.clone(),
            coord: tile.coord,
            state: tile.state,
            treasure: tile.treasure,
            occupants: self.occupants(id),
        })
    }

    /// Adventurers standing on `tile`, in seat order.
    #[must_use]
    pub fn occupants(&self, tile: TileId) -> SmallVec<[PlayerId; 4]> {
        self.players
            .iter()
            .filter(|(_, a)| a.tile() == Some(tile))
            .map(|(id, _)| id)
            .collect()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Adventurer> {
        self.players.get(player)
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Adventurer)> {
        self.players.iter()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&[TreasureCard]> {
        self.players.get(player).map(Adventurer::hand)
    }

    #[must_use]
    pub fn treasures(&self) -> &[Treasure] {
        &self.treasures
    }

    /// Captured treasures in `TreasureType::ALL` order.
    #[must_use]
    pub fn captured_treasures(&self) -> Vec<TreasureType> {
        TreasureType::ALL
            .into_iter()
            .filter(|&kind| self.treasures.iter().any(|t| t.kind == kind && t.is_captured()))
            .collect()
    }

    #[must_use]
    pub fn water_level(&self) -> u8 {
        self.meter.level()
    }

    #[must_use]
    pub fn flood_draw_count(&self) -> u8 {
        self.meter.flood_draw_count()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.outcome == Some(GameOutcome::Won)
    }

    /// Whether `player` has a free shore-up open in the current action.
    #[must_use]
    pub fn may_shore_up_again(&self, player: PlayerId) -> bool {
        self.players
            .get(player)
            .is_some_and(Adventurer::may_shore_up_again)
    }

    #[must_use]
    pub fn pending_discard(&self) -> Option<PlayerId> {
        self.pending_discard
    }

    #[must_use]
    pub fn treasure_deck(&self) -> &Deck<TreasureCard> {
        &self.treasure_deck
    }

    #[must_use]
    pub fn flood_deck(&self) -> &Deck<FloodCard> {
        &self.flood_deck
    }

    /// Every accepted command, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Tiles `player` could move to right now (ignoring whose turn it is).
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` or `PlayerNotPlaced`.
    pub fn legal_moves(&self, player: PlayerId) -> EngineResult<Vec<TileId>> {
        let mover = self.mover(player)?;
        Ok(legal_moves(&self.grid, &mover))
    }

    /// Flooded tiles `player` could shore up right now.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` or `PlayerNotPlaced`.
    pub fn legal_shore_ups(&self, player: PlayerId) -> EngineResult<Vec<TileId>> {
        let mover = self.mover(player)?;
        Ok(shore_up_targets(&self.grid, &mover))
    }

    // === Action phase ===

    /// Move `player` to `tile` for one action point.
    ///
    /// # Errors
    ///
    /// Precondition errors for out-of-turn calls; `RuleViolation` when the
    /// role cannot reach the tile.
    pub fn move_player(&mut self, player: PlayerId, tile: TileId) -> EngineResult<ActionReport> {
        self.ensure_acting(player)?;
        self.ensure_tile(tile)?;
        self.ensure_budget()?;
        let kind = {
            let mover = self.mover(player)?;
            check_move(&self.grid, &mover, tile)?
        };

        let stamp = self.stamp();
        let adventurer = &mut self.players[player];
        if kind == MoveKind::Flight {
            adventurer.use_flight();
        }
        adventurer.place(tile);
        log::debug!("{player} moves to {} ({kind:?})", self.tile_name(tile));
        self.spend_action(player);
        Ok(self.finish(stamp, Command::Move { player, tile }, Vec::new()))
    }

    /// Shore up a flooded tile.
    ///
    /// Costs one action point, except a shore-up made while the role's
    /// bonus window is open (the Engineer's second shore-up).
    ///
    /// # Errors
    ///
    /// Precondition errors for out-of-turn calls; `RuleViolation` for sunk,
    /// dry or unreachable tiles.
    pub fn shore_up(&mut self, player: PlayerId, tile: TileId) -> EngineResult<ActionReport> {
        self.ensure_acting(player)?;
        self.ensure_tile(tile)?;
        let bonus = self.players[player].may_shore_up_again();
        if !bonus {
            self.ensure_budget()?;
        }
        {
            let mover = self.mover(player)?;
            check_shore_up(&self.grid, &mover, tile)?;
        }

        let stamp = self.stamp();
        self.grid.shore_up(tile);
        if bonus {
            self.players[player].take_bonus_shore_up();
        } else {
            self.spend_action(player);
            self.players[player].open_bonus_shore_ups();
        }
        log::debug!("{player} shores up {}", self.tile_name(tile));
        Ok(self.finish(stamp, Command::ShoreUp { player, tile }, Vec::new()))
    }

    /// Hand a treasure card to another adventurer.
    ///
    /// # Errors
    ///
    /// `SelfTarget`, `NotTradable`, `CardNotInHand`, or `NotOnSameTile` for
    /// roles that must share a tile to trade.
    pub fn give_card(&mut self, giver: PlayerId, receiver: PlayerId, card: TreasureCard) -> EngineResult<ActionReport> {
        self.ensure_acting(giver)?;
        self.adventurer(receiver)?;
        self.ensure_budget()?;
        if giver == receiver {
            return Err(RuleViolation::SelfTarget.into());
        }
        if !card.is_tradable() {
            return Err(RuleViolation::NotTradable(card).into());
        }
        if !self.players[giver].holds(card) {
            return Err(RuleViolation::CardNotInHand { player: giver, card }.into());
        }
        if self.players[giver].capabilities().exchange == ExchangeReach::SameTile {
            let from = self.placed(giver)?;
            let to = self.placed(receiver)?;
            if from != to {
                return Err(RuleViolation::NotOnSameTile { giver, receiver }.into());
            }
        }

        let stamp = self.stamp();
        self.players[giver].remove_card(card);
        self.players[receiver].add_card(card);
        log::debug!("{giver} gives {card} to {receiver}");
        self.spend_action(giver);
        let discarded = self.check_hand_limit(receiver);
        Ok(self.finish(stamp, Command::GiveCard { giver, receiver, card }, discarded))
    }

    /// Capture the treasure of the tile `player` stands on.
    ///
    /// # Errors
    ///
    /// `NoTreasureHere`, `TreasureAlreadyCaptured`, or
    /// `NotEnoughTreasureCards`.
    pub fn capture_treasure(&mut self, player: PlayerId) -> EngineResult<ActionReport> {
        self.ensure_acting(player)?;
        self.ensure_budget()?;
        let tile = self.placed(player)?;
        let kind = self
            .grid
            .get(tile)
            .and_then(|t| t.treasure)
            .ok_or(RuleViolation::NoTreasureHere(tile))?;
        let index = self
            .treasures
            .iter()
            .position(|t| t.kind == kind && t.is_site(tile))
            .ok_or(RuleViolation::NoTreasureHere(tile))?;
        if self.treasures[index].is_captured() {
            return Err(RuleViolation::TreasureAlreadyCaptured(kind).into());
        }
        let adventurer = &self.players[player];
        let needed = adventurer.capabilities().capture_threshold;
        let held = adventurer.treasure_cards(kind);
        if held < needed {
            return Err(RuleViolation::NotEnoughTreasureCards { treasure: kind, needed, held }.into());
        }

        let stamp = self.stamp();
        let card = TreasureCard::Treasure(kind);
        for _ in 0..needed {
            self.players[player].remove_card(card);
            self.treasure_deck.discard(card);
        }
        self.treasures[index].capture(player);
        self.players[player].collect(kind);
        log::info!("{player} captured {kind}");
        self.spend_action(player);
        Ok(self.finish(stamp, Command::CaptureTreasure { player }, Vec::new()))
    }

    /// Play Sandbags or a Helicopter Lift for one action point.
    ///
    /// # Errors
    ///
    /// `NotSpecialCard`, `CardNotInHand`, `TargetMismatch`, and the target's
    /// own rule violations.
    pub fn play_special_card(
        &mut self,
        player: PlayerId,
        card: TreasureCard,
        target: SpecialTarget,
    ) -> EngineResult<ActionReport> {
        self.ensure_acting(player)?;
        self.ensure_budget()?;
        if !card.is_special() {
            return Err(RuleViolation::NotSpecialCard(card).into());
        }
        if !self.players[player].holds(card) {
            return Err(RuleViolation::CardNotInHand { player, card }.into());
        }
        self.check_special(card, &target)?;

        let stamp = self.stamp();
        match &target {
            SpecialTarget::Sandbag { tile } => {
                self.grid.shore_up(*tile);
                log::debug!("{player} sandbags {}", self.tile_name(*tile));
            }
            SpecialTarget::Fly { passengers, destination } => {
                for &passenger in passengers {
                    self.players[passenger].place(*destination);
                }
                log::debug!("{player} flies {passengers:?} to {}", self.tile_name(*destination));
            }
            SpecialTarget::LiftOff => {
                self.lifted_off = true;
                log::info!("{player} calls the helicopter for lift-off");
            }
        }
        self.players[player].remove_card(card);
        self.treasure_deck.discard(card);
        self.spend_action(player);
        Ok(self.finish(stamp, Command::PlaySpecial { player, card, target }, Vec::new()))
    }

    /// Move another adventurer up to two steps (Navigator only).
    ///
    /// # Errors
    ///
    /// `CannotNavigate` for other roles, `SelfTarget`, and reach violations.
    pub fn navigate(&mut self, navigator: PlayerId, traveller: PlayerId, tile: TileId) -> EngineResult<ActionReport> {
        self.ensure_acting(navigator)?;
        self.adventurer(traveller)?;
        self.ensure_tile(tile)?;
        self.ensure_budget()?;
        let role = self.players[navigator].role;
        if !role.capabilities().directs_others {
            return Err(RuleViolation::CannotNavigate(role).into());
        }
        if navigator == traveller {
            return Err(RuleViolation::SelfTarget.into());
        }
        let (from, targets) = {
            let mover = self.mover(traveller)?;
            (mover.from, navigation_targets(&self.grid, &mover))
        };
        if self.grid.is_sunk(tile) {
            return Err(RuleViolation::TileSunk(tile).into());
        }
        if !targets.contains(&tile) {
            return Err(RuleViolation::OutOfReach { from, target: tile }.into());
        }

        let stamp = self.stamp();
        self.players[traveller].place(tile);
        log::debug!("{navigator} directs {traveller} to {}", self.tile_name(tile));
        self.spend_action(navigator);
        Ok(self.finish(stamp, Command::Navigate { navigator, traveller, tile }, Vec::new()))
    }

    /// Discard a card from the hand of the adventurer over the limit.
    ///
    /// Allowed whenever a discard is pending for `player`, whatever the phase.
    ///
    /// # Errors
    ///
    /// `NoDiscardPending` or `CardNotInHand`.
    pub fn discard_card(&mut self, player: PlayerId, card: TreasureCard) -> EngineResult<ActionReport> {
        self.ensure_live()?;
        self.adventurer(player)?;
        if self.pending_discard != Some(player) {
            return Err(PreconditionError::NoDiscardPending(player).into());
        }
        if !self.players[player].holds(card) {
            return Err(RuleViolation::CardNotInHand { player, card }.into());
        }

        let stamp = self.stamp();
        self.players[player].remove_card(card);
        self.treasure_deck.discard(card);
        log::debug!("{player} discards {card}");
        if self.players[player].hand().len() <= self.config.hand_limit {
            self.pending_discard = None;
            self.settle_draw_phase();
        }
        Ok(self.finish(stamp, Command::Discard { player, card }, Vec::new()))
    }

    /// Forfeit the rest of the action phase.
    ///
    /// # Errors
    ///
    /// `GameOver`, `DiscardPending`, or `WrongPhase`.
    pub fn end_actions(&mut self) -> EngineResult<ActionReport> {
        self.ensure_live()?;
        self.ensure_no_pending()?;
        self.ensure_phase(Phase::Action)?;

        let stamp = self.stamp();
        self.close_action_phase();
        Ok(self.finish(stamp, Command::EndActions, Vec::new()))
    }

    // === Draw phases ===

    /// Draw the turn's treasure cards.
    ///
    /// Stops early when the hand goes over the limit under
    /// `DiscardPolicy::CallerDirected`; call again after `discard_card`.
    ///
    /// # Errors
    ///
    /// `GameOver`, `DiscardPending`, or `WrongPhase`.
    pub fn draw_treasure_cards(&mut self) -> EngineResult<DrawReport> {
        self.ensure_live()?;
        self.ensure_no_pending()?;
        self.ensure_phase(Phase::DrawTreasure)?;

        let stamp = self.stamp();
        let report = self.draw_treasure()?;
        self.record(stamp, Command::DrawTreasure);
        self.refresh_outcome();
        Ok(report)
    }

    /// Draw and resolve the turn's flood cards, then pass the turn.
    ///
    /// # Errors
    ///
    /// `GameOver` or `WrongPhase`; `InvariantError` if the flood deck has
    /// vanished entirely.
    pub fn draw_flood_cards(&mut self) -> EngineResult<FloodReport> {
        self.ensure_live()?;
        self.ensure_no_pending()?;
        self.ensure_phase(Phase::DrawFlood)?;

        let stamp = self.stamp();
        let report = self.draw_flood()?;
        self.record(stamp, Command::DrawFlood);
        Ok(report)
    }

    /// Run every remaining phase of the current turn up to the next
    /// adventurer's action phase. Pending discards use the automatic rule.
    ///
    /// # Errors
    ///
    /// `GameOver`, or an invariant failure while drawing.
    pub fn advance_turn(&mut self) -> EngineResult<TurnReport> {
        self.ensure_live()?;

        let stamp = self.stamp();
        let mut report = TurnReport::default();
        self.discard_pending_automatically(&mut report.discarded);
        if self.phase == Phase::Action {
            self.close_action_phase();
        }
        while self.phase == Phase::DrawTreasure && self.outcome.is_none() {
            let draw = self.draw_treasure()?;
            report.treasure_draws.extend(draw.draws);
            let active = self.active;
            report.discarded.extend(draw.discarded.into_iter().map(|c| (active, c)));
            self.discard_pending_automatically(&mut report.discarded);
        }
        if self.phase == Phase::DrawFlood && self.outcome.is_none() {
            report.flood = Some(self.draw_flood()?);
        }
        self.record(stamp, Command::AdvanceTurn);
        report.outcome = self.refresh_outcome();
        Ok(report)
    }

    /// Apply a command value; the replay entry point.
    ///
    /// # Errors
    ///
    /// Whatever the matching typed operation returns.
    pub fn apply(&mut self, command: Command) -> EngineResult<()> {
        match command {
            Command::Move { player, tile } => self.move_player(player, tile).map(drop),
            Command::ShoreUp { player, tile } => self.shore_up(player, tile).map(drop),
            Command::GiveCard { giver, receiver, card } => self.give_card(giver, receiver, card).map(drop),
            Command::CaptureTreasure { player } => self.capture_treasure(player).map(drop),
            Command::PlaySpecial { player, card, target } => self.play_special_card(player, card, target).map(drop),
            Command::Navigate { navigator, traveller, tile } => self.navigate(navigator, traveller, tile).map(drop),
            Command::Discard { player, card } => self.discard_card(player, card).map(drop),
            Command::EndActions => self.end_actions().map(drop),
            Command::DrawTreasure => self.draw_treasure_cards().map(drop),
            Command::DrawFlood => self.draw_flood_cards().map(drop),
            Command::AdvanceTurn => self.advance_turn().map(drop),
        }
    }

    // === Setup hooks ===

    /// Draw and resolve the setup flood cards. Not recorded in the history.
    pub(crate) fn initial_flood(&mut self, draws: u8) -> EngineResult<()> {
        for _ in 0..draws {
            let card = self.draw_flood_card()?;
            self.resolve_flood_card(card)?;
        }
        self.refresh_outcome();
        Ok(())
    }

    // === Guards ===

    fn ensure_live(&self) -> Result<(), PreconditionError> {
        match self.outcome {
            Some(_) => Err(PreconditionError::GameOver),
            None => Ok(()),
        }
    }

    fn ensure_no_pending(&self) -> Result<(), PreconditionError> {
        match self.pending_discard {
            Some(player) => Err(PreconditionError::DiscardPending(player)),
            None => Ok(()),
        }
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), PreconditionError> {
        if self.phase != expected {
            return Err(PreconditionError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn ensure_tile(&self, tile: TileId) -> Result<(), PreconditionError> {
        match self.grid.get(tile) {
            Some(_) => Ok(()),
            None => Err(PreconditionError::UnknownTile(tile)),
        }
    }

    fn ensure_budget(&self) -> Result<(), RuleViolation> {
        if self.turn.actions_remaining == 0 {
            return Err(RuleViolation::NoActionsRemaining);
        }
        Ok(())
    }

    /// Live game, known player, no pending discard, action phase, their turn.
    fn ensure_acting(&self, player: PlayerId) -> Result<(), PreconditionError> {
        self.ensure_live()?;
        self.adventurer(player)?;
        self.ensure_no_pending()?;
        self.ensure_phase(Phase::Action)?;
        if player != self.active {
            return Err(PreconditionError::NotActivePlayer {
                player,
                active: self.active,
            });
        }
        Ok(())
    }

    fn adventurer(&self, player: PlayerId) -> Result<&Adventurer, PreconditionError> {
        self.players
            .get(player)
            .ok_or(PreconditionError::UnknownPlayer(player))
    }

    fn placed(&self, player: PlayerId) -> Result<TileId, PreconditionError> {
        self.adventurer(player)?
            .tile()
            .ok_or(PreconditionError::PlayerNotPlaced(player))
    }

    fn mover(&self, player: PlayerId) -> Result<Mover<'_>, PreconditionError> {
        Mover::of(self.adventurer(player)?).ok_or(PreconditionError::PlayerNotPlaced(player))
    }

    fn tile_name(&self, tile: TileId) -> &str {
        self.grid.get(tile).map_or("?", |t| t.name.as_str())
    }

    // === Bookkeeping ===

    fn stamp(&self) -> Stamp {
        Stamp {
            player: self.active,
            turn: self.turn.number,
            sequence: self.turn.sequence,
        }
    }

    fn record(&mut self, stamp: Stamp, command: Command) {
        self.history
            .push_back(ActionRecord::new(stamp.player, command, stamp.turn, stamp.sequence));
        if self.turn.number == stamp.turn {
            self.turn.sequence += 1;
        }
    }

    fn spend_action(&mut self, player: PlayerId) {
        self.turn.actions_remaining = self.turn.actions_remaining.saturating_sub(1);
        self.players[player].close_bonus_shore_ups();
    }

    /// Record, check for game over, and leave the action phase once the
    /// budget is gone and no free shore-up is open.
    fn finish(&mut self, stamp: Stamp, command: Command, discarded: Vec<TreasureCard>) -> ActionReport {
        self.record(stamp, command);
        self.refresh_outcome();
        let bonus_open = self.players[self.active].may_shore_up_again();
        if self.outcome.is_none() && self.phase == Phase::Action && self.turn.actions_remaining == 0 && !bonus_open {
            self.enter_phase(Phase::DrawTreasure);
        }
        ActionReport {
            actions_remaining: self.turn.actions_remaining,
            phase: self.phase,
            may_shore_up_again: bonus_open,
            discarded,
            outcome: self.outcome,
        }
    }

    fn refresh_outcome(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_none() {
            self.outcome = evaluate(&OutcomeInputs {
                grid: &self.grid,
                meter: &self.meter,
                treasures: &self.treasures,
                players: &self.players,
                drowned: self.drowned,
                lifted_off: self.lifted_off,
                require_lift_off: self.config.require_lift_off,
            });
            match self.outcome {
                Some(GameOutcome::Won) => log::info!("the adventurers escaped the island"),
                Some(GameOutcome::Lost(reason)) => log::info!("game lost: {reason}"),
                None => {}
            }
        }
        self.outcome
    }

    fn enter_phase(&mut self, phase: Phase) {
        log::info!("turn {}: {} enters {phase:?}", self.turn.number, self.active);
        self.phase = phase;
    }

    fn close_action_phase(&mut self) {
        let active = self.active;
        self.players[active].close_bonus_shore_ups();
        self.turn.actions_remaining = 0;
        self.enter_phase(Phase::DrawTreasure);
    }

    // === Hand limit ===

    /// Enforce the hand limit on `player` per the discard policy. Returns the
    /// cards discarded automatically.
    fn check_hand_limit(&mut self, player: PlayerId) -> Vec<TreasureCard> {
        if self.players[player].hand().len() <= self.config.hand_limit {
            return Vec::new();
        }
        match self.config.discard_policy {
            DiscardPolicy::Automatic => self.auto_discard(player),
            DiscardPolicy::CallerDirected => {
                log::debug!("{player} is over the hand limit, waiting for a discard");
                self.pending_discard = Some(player);
                Vec::new()
            }
        }
    }

    fn auto_discard(&mut self, player: PlayerId) -> Vec<TreasureCard> {
        let mut discarded = Vec::new();
        while self.players[player].hand().len() > self.config.hand_limit {
            let Some(card) = self.players[player].auto_discard_choice() else {
                break;
            };
            self.players[player].remove_card(card);
            self.treasure_deck.discard(card);
            log::warn!("{player} over the hand limit, discarding {card}");
            discarded.push(card);
        }
        if self.pending_discard == Some(player) {
            self.pending_discard = None;
        }
        discarded
    }

    fn discard_pending_automatically(&mut self, discarded: &mut Vec<(PlayerId, TreasureCard)>) {
        if let Some(player) = self.pending_discard {
            discarded.extend(self.auto_discard(player).into_iter().map(|c| (player, c)));
            self.settle_draw_phase();
        }
    }

    /// Move on to flooding once every treasure draw is done and nobody owes
    /// a discard.
    fn settle_draw_phase(&mut self) {
        if self.phase == Phase::DrawTreasure
            && self.pending_discard.is_none()
            && self.outcome.is_none()
            && self.turn.treasure_drawn >= self.config.treasure_draws_per_turn
        {
            self.enter_phase(Phase::DrawFlood);
        }
    }

    // === Treasure draws ===

    fn draw_treasure(&mut self) -> EngineResult<DrawReport> {
        let mut report = DrawReport::default();
        let active = self.active;
        while self.turn.treasure_drawn < self.config.treasure_draws_per_turn
            && self.pending_discard.is_none()
            && self.outcome.is_none()
        {
            self.turn.treasure_drawn += 1;
            match self.treasure_deck.draw(&mut self.rng) {
                None => {
                    log::warn!("the treasure deck is exhausted");
                    report.draws.push(TreasureDraw::Empty);
                }
                Some(TreasureCard::WatersRise) => {
                    let level = self.waters_rise();
                    report.draws.push(TreasureDraw::WatersRise { level });
                    self.refresh_outcome();
                }
                Some(card) => {
                    log::debug!("{active} draws {card}");
                    self.players[active].add_card(card);
                    report.draws.push(TreasureDraw::Card(card));
                    report.discarded.extend(self.check_hand_limit(active));
                }
            }
        }
        self.settle_draw_phase();
        report.pending_discard = self.pending_discard;
        report.phase = self.phase;
        Ok(report)
    }

    /// Raise the water, stack the shuffled flood discard on top of the flood
    /// deck, and retire the card to the treasure discard.
    fn waters_rise(&mut self) -> u8 {
        let level = self.meter.raise();
        self.flood_deck.rise_reshuffle(&mut self.rng);
        self.treasure_deck.discard(TreasureCard::WatersRise);
        level
    }

    // === Flood draws ===

    fn draw_flood(&mut self) -> EngineResult<FloodReport> {
        let mut report = FloodReport::default();
        for _ in 0..self.meter.flood_draw_count() {
            let card = self.draw_flood_card()?;
            report.events.push(self.resolve_flood_card(card)?);
            if self.refresh_outcome().is_some() {
                return Ok(report);
            }
        }
        report.next_player = Some(self.begin_next_turn());
        Ok(report)
    }

    fn draw_flood_card(&mut self) -> Result<FloodCard, InvariantError> {
        self.flood_deck
            .draw(&mut self.rng)
            .ok_or_else(|| InvariantError::DeckExhausted("flood").logged())
    }

    fn resolve_flood_card(&mut self, card: FloodCard) -> EngineResult<FloodEvent> {
        let tile = card.tile();
        if self.grid.is_sunk(tile) {
            self.flood_deck.remove_from_play(card);
            return Ok(FloodEvent::AlreadySunk(tile));
        }
        match self.grid.flood(tile)? {
            FloodState::Sunk => {
                self.flood_deck.remove_from_play(card);
                let swims = self.evacuate(tile);
                Ok(FloodEvent::Sunk { tile, swims })
            }
            FloodState::Normal | FloodState::Flooded => {
                self.flood_deck.discard(card);
                Ok(FloodEvent::Flooded(tile))
            }
        }
    }

    /// Move everyone off a tile that just sank. The first adventurer left
    /// with nowhere to go is remembered as drowned.
    fn evacuate(&mut self, tile: TileId) -> Vec<Swim> {
        let mut swims = Vec::new();
        for player in self.occupants(tile) {
            let caps = self.players[player].capabilities();
            let to = swim_destinations(&self.grid, caps, tile).first().copied();
            match to {
                Some(dest) => {
                    self.players[player].place(dest);
                    log::info!("{player} swims to {}", self.tile_name(dest));
                }
                None => {
                    log::info!("{player} has nowhere to swim");
                    self.drowned.get_or_insert(player);
                }
            }
            swims.push(Swim { player, to });
        }
        swims
    }

    fn begin_next_turn(&mut self) -> PlayerId {
        let next = self.active.next(self.players.player_count());
        self.active = next;
        self.turn.advance(self.config.actions_per_turn);
        self.players[next].reset_turn();
        self.phase = Phase::Action;
        log::info!("turn {}: {next} ({}) to act", self.turn.number, self.players[next].role);
        next
    }

    // === Special cards ===

    fn check_special(&self, card: TreasureCard, target: &SpecialTarget) -> EngineResult<()> {
        match (card, target) {
            (TreasureCard::Sandbags, SpecialTarget::Sandbag { tile }) => {
                self.ensure_tile(*tile)?;
                if self.grid.is_sunk(*tile) {
                    return Err(RuleViolation::TileSunk(*tile).into());
                }
                if !self.grid.is_flooded(*tile) {
                    return Err(RuleViolation::NotFlooded(*tile).into());
                }
                Ok(())
            }
            (TreasureCard::HelicopterLift, SpecialTarget::Fly { passengers, destination }) => {
                self.check_flight(passengers, *destination)
            }
            (TreasureCard::HelicopterLift, SpecialTarget::LiftOff) => {
                if !all_aboard(&self.grid, &self.treasures, &self.players) {
                    return Err(RuleViolation::LiftOffNotReady.into());
                }
                Ok(())
            }
            _ => Err(RuleViolation::TargetMismatch(card).into()),
        }
    }

    fn check_flight(&self, passengers: &[PlayerId], destination: TileId) -> EngineResult<()> {
        if passengers.is_empty() {
            return Err(RuleViolation::NoPassengers.into());
        }
        self.ensure_tile(destination)?;
        let mut origin = None;
        for &passenger in passengers {
            let tile = self.placed(passenger)?;
            match origin {
                None => origin = Some(tile),
                Some(shared) if shared != tile => return Err(RuleViolation::PassengersSplit.into()),
                Some(_) => {}
            }
        }
        if self.grid.is_sunk(destination) {
            return Err(RuleViolation::TileSunk(destination).into());
        }
        if origin == Some(destination) {
            return Err(RuleViolation::AlreadyThere(destination).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Layout;
    use crate::core::EngineError;
    use crate::roles::Role;
    use crate::rules::GameBuilder;

    const STONE: TreasureCard = TreasureCard::Treasure(TreasureType::EarthStone);

    /// Fixed layout, empty hands, no setup flooding, Pilot then Engineer.
    fn quiet_game() -> Game {
        GameBuilder::new(7)
            .player_with_role("Ann", Role::Pilot)
            .player_with_role("Bo", Role::Engineer)
            .layout(Layout::Fixed)
            .config(EngineConfig::default().with_initial_hand_size(0))
            .skip_initial_flood()
            .build()
            .unwrap()
    }

    fn flood(game: &mut Game, tile: u8) {
        game.grid.flood(TileId(tile)).unwrap();
    }

    #[test]
    fn test_game_creation() {
        let game = quiet_game();
        assert_eq!(game.current_player(), PlayerId(0));
        assert_eq!(game.phase(), Phase::Action);
        assert_eq!(game.actions_remaining(), 3);
        assert_eq!(game.turn_number(), 1);
        // Pilot starts on Fools' Landing, Engineer on Bronze Gate.
        assert_eq!(game.player(PlayerId(0)).unwrap().tile(), Some(TileId(4)));
        assert_eq!(game.player(PlayerId(1)).unwrap().tile(), Some(TileId(3)));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_budget_runs_out_into_draw_phase() {
        let mut game = quiet_game();
        let p = PlayerId(0);
        game.move_player(p, TileId(3)).unwrap();
        game.move_player(p, TileId(4)).unwrap();
        let report = game.move_player(p, TileId(3)).unwrap();
        assert_eq!(report.actions_remaining, 0);
        assert_eq!(report.phase, Phase::DrawTreasure);

        let err = game.move_player(p, TileId(4)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Precondition(PreconditionError::WrongPhase {
                expected: Phase::Action,
                actual: Phase::DrawTreasure
            })
        );
        assert_eq!(game.history().len(), 3);
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut game = quiet_game();
        let err = game.move_player(PlayerId(1), TileId(8)).unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(game.actions_remaining(), 3);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut game = quiet_game();
        flood(&mut game, 9);
        flood(&mut game, 9);
        let before = game.snapshot();
        let err = game.move_player(PlayerId(0), TileId(9)).unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::TileSunk(TileId(9))));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_give_card_needs_shared_tile() {
        let mut game = quiet_game();
        game.players[PlayerId(0)].add_card(STONE);

        let err = game.give_card(PlayerId(0), PlayerId(1), STONE).unwrap_err();
        assert_eq!(
            err,
            EngineError::Rule(RuleViolation::NotOnSameTile { giver: PlayerId(0), receiver: PlayerId(1) })
        );

        game.move_player(PlayerId(0), TileId(3)).unwrap();
        game.give_card(PlayerId(0), PlayerId(1), STONE).unwrap();
        assert!(game.hand(PlayerId(1)).unwrap().contains(&STONE));
        assert_eq!(game.actions_remaining(), 1);

        game.players[PlayerId(0)].add_card(TreasureCard::Sandbags);
        let err = game.give_card(PlayerId(0), PlayerId(1), TreasureCard::Sandbags).unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::NotTradable(TreasureCard::Sandbags)));
    }

    #[test]
    fn test_capture_treasure() {
        let mut game = quiet_game();
        // Temple of the Sun sits next to Fools' Landing in the fixed layout.
        game.move_player(PlayerId(0), TileId(1)).unwrap();
        for _ in 0..3 {
            game.players[PlayerId(0)].add_card(STONE);
        }
        let err = game.capture_treasure(PlayerId(0)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Rule(RuleViolation::NotEnoughTreasureCards {
                treasure: TreasureType::EarthStone,
                needed: 4,
                held: 3,
            })
        );

        game.players[PlayerId(0)].add_card(STONE);
        game.capture_treasure(PlayerId(0)).unwrap();
        assert_eq!(game.captured_treasures(), vec![TreasureType::EarthStone]);
        assert_eq!(game.players[PlayerId(0)].collected(), &[TreasureType::EarthStone]);
        assert_eq!(game.actions_remaining(), 1);

        let err = game.capture_treasure(PlayerId(0)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Rule(RuleViolation::TreasureAlreadyCaptured(TreasureType::EarthStone))
        );
    }

    #[test]
    fn test_sandbags_anywhere() {
        let mut game = quiet_game();
        flood(&mut game, 23);
        game.players[PlayerId(0)].add_card(TreasureCard::Sandbags);

        let err = game
            .play_special_card(PlayerId(0), TreasureCard::Sandbags, SpecialTarget::LiftOff)
            .unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::TargetMismatch(TreasureCard::Sandbags)));

        game.play_special_card(PlayerId(0), TreasureCard::Sandbags, SpecialTarget::Sandbag { tile: TileId(23) })
            .unwrap();
        assert!(!game.grid.is_flooded(TileId(23)));
        assert!(!game.players[PlayerId(0)].holds(TreasureCard::Sandbags));
        assert_eq!(game.treasure_deck.discard_pile().last(), Some(&TreasureCard::Sandbags));
    }

    #[test]
    fn test_helicopter_flight() {
        let mut game = quiet_game();
        game.move_player(PlayerId(0), TileId(3)).unwrap();
        game.players[PlayerId(0)].add_card(TreasureCard::HelicopterLift);

        let lift = TreasureCard::HelicopterLift;
        let err = game
            .play_special_card(PlayerId(0), lift, SpecialTarget::fly(&[], TileId(20)))
            .unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::NoPassengers));

        let err = game
            .play_special_card(PlayerId(0), lift, SpecialTarget::LiftOff)
            .unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::LiftOffNotReady));

        game.play_special_card(PlayerId(0), lift, SpecialTarget::fly(&[PlayerId(0), PlayerId(1)], TileId(20)))
            .unwrap();
        assert_eq!(game.occupants(TileId(20)).as_slice(), &[PlayerId(0), PlayerId(1)]);
    }

    #[test]
    fn test_discard_pending_blocks_actions() {
        let mut game = quiet_game();
        game.move_player(PlayerId(0), TileId(3)).unwrap();
        for _ in 0..5 {
            game.players[PlayerId(1)].add_card(TreasureCard::Treasure(TreasureType::CrystalOfFire));
        }
        game.players[PlayerId(0)].add_card(STONE);
        game.give_card(PlayerId(0), PlayerId(1), STONE).unwrap();
        assert_eq!(game.pending_discard(), Some(PlayerId(1)));

        let err = game.move_player(PlayerId(0), TileId(4)).unwrap_err();
        assert_eq!(err, EngineError::Precondition(PreconditionError::DiscardPending(PlayerId(1))));

        game.discard_card(PlayerId(1), STONE).unwrap();
        assert_eq!(game.pending_discard(), None);
        game.move_player(PlayerId(0), TileId(4)).unwrap();
    }

    #[test]
    fn test_navigator_directs_others() {
        let mut game = GameBuilder::new(3)
            .player_with_role("Nia", Role::Navigator)
            .player_with_role("Mo", Role::Messenger)
            .layout(Layout::Fixed)
            .config(EngineConfig::default().with_initial_hand_size(0))
            .skip_initial_flood()
            .build()
            .unwrap();
        // Navigator on Gold Gate (2,5); Messenger on Silver Gate (4,3).
        let nav = PlayerId(0);
        let mes = PlayerId(1);

        // Two steps up: Silver Gate -> Misty Marsh -> Crimson Forest.
        game.navigate(nav, mes, TileId(9)).unwrap();
        assert_eq!(game.player(mes).unwrap().tile(), Some(TileId(9)));

        let err = game.navigate(nav, nav, TileId(10)).unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::SelfTarget));

        let err = game.navigate(nav, mes, TileId(22)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Rule(RuleViolation::OutOfReach { from: TileId(9), target: TileId(22) })
        );
    }

    #[test]
    fn test_only_navigator_navigates() {
        let mut game = quiet_game();
        let err = game.navigate(PlayerId(0), PlayerId(1), TileId(8)).unwrap_err();
        assert_eq!(err, EngineError::Rule(RuleViolation::CannotNavigate(Role::Pilot)));
    }
}
