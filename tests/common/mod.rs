//! Shared helpers for integration tests.
//!
//! Games are arranged through snapshots: build a quiet game, edit the
//! snapshot's public parts, restore.

#![allow(dead_code)]

use sinking_isle::board::{Layout, TileId};
use sinking_isle::cards::{Deck, FloodCard, TreasureCard};
use sinking_isle::core::EngineConfig;
use sinking_isle::roles::Role;
use sinking_isle::rules::{Game, GameBuilder};
use sinking_isle::snapshot::Snapshot;

/// Fixed layout, empty hands, every tile dry.
///
/// Fixed-layout ids used throughout the tests:
///
/// ```text
///            0  1
///         2  3  4  5
///      6  7  8  9 10 11
///     12 13 14 15 16 17
///        18 19 20 21
///           22 23
/// ```
///
/// 4 is Fools' Landing; Earth 0/1, Fire 2/5, Wind 12/17, Chalice 18/21.
pub fn quiet_game(seed: u64, roles: &[Role]) -> Game {
    quiet_game_with(seed, roles, EngineConfig::default())
}

pub fn quiet_game_with(seed: u64, roles: &[Role], config: EngineConfig) -> Game {
    let mut builder = GameBuilder::new(seed)
        .layout(Layout::Fixed)
        .config(config.with_initial_hand_size(0))
        .skip_initial_flood();
    for (index, role) in roles.iter().enumerate() {
        builder = builder.player_with_role(format!("P{index}"), *role);
    }
    builder.build().unwrap()
}

/// Restore `game` after editing its snapshot.
pub fn edited(game: &Game, edit: impl FnOnce(&mut Snapshot)) -> Game {
    let mut snapshot = game.snapshot();
    edit(&mut snapshot);
    Game::restore(snapshot).unwrap()
}

pub fn flood(snapshot: &mut Snapshot, tile: u8) {
    snapshot.grid.flood(TileId(tile)).unwrap();
}

pub fn sink(snapshot: &mut Snapshot, tile: u8) {
    flood(snapshot, tile);
    flood(snapshot, tile);
}

/// Put the named tiles' flood cards on top of the draw pile, first named
/// drawn first.
pub fn stack_flood(snapshot: &mut Snapshot, top_first: &[u8]) {
    let named = |card: &FloodCard| top_first.contains(&card.tile().0);
    let deck = &snapshot.flood_deck;
    let mut draw: Vec<FloodCard> = deck.draw_pile().iter().filter(|c| !named(c)).copied().collect();
    let discard: Vec<FloodCard> = deck.discard_pile().iter().filter(|c| !named(c)).copied().collect();
    draw.extend(top_first.iter().rev().map(|&id| FloodCard(TileId(id))));
    snapshot.flood_deck = Deck::from_piles(draw, discard, deck.removed().to_vec());
}

/// Set Waters Rise cards aside (into the removed pile) and put `top_first`
/// on top of the treasure draw pile, first named drawn first.
pub fn stack_treasure(snapshot: &mut Snapshot, top_first: &[TreasureCard]) {
    let deck = &snapshot.treasure_deck;
    let (mut rising, mut draw): (Vec<TreasureCard>, Vec<TreasureCard>) = deck
        .draw_pile()
        .iter()
        .copied()
        .partition(|&c| c == TreasureCard::WatersRise);
    for card in top_first.iter().rev() {
        if *card == TreasureCard::WatersRise {
            rising.pop();
        } else if let Some(pos) = draw.iter().position(|c| c == card) {
            draw.remove(pos);
        }
        draw.push(*card);
    }
    let mut removed = deck.removed().to_vec();
    removed.extend(rising);
    snapshot.treasure_deck = Deck::from_piles(draw, deck.discard_pile().to_vec(), removed);
}

/// Take the first shore-up and the first move on offer, then advance.
/// Rejected attempts are ignored; they leave no trace.
pub fn play_simple_turn(game: &mut Game) {
    let player = game.current_player();
    if let Some(&tile) = game.legal_shore_ups(player).unwrap_or_default().first() {
        let _ = game.shore_up(player, tile);
    }
    if let Some(&tile) = game.legal_moves(player).unwrap_or_default().last() {
        let _ = game.move_player(player, tile);
    }
    if !game.is_game_over() {
        game.advance_turn().unwrap();
    }
}
