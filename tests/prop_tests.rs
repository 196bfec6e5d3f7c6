//! Property-based tests for the rule engine's invariants.

use proptest::prelude::*;

use sinking_isle::board::{standard_island, FloodState, Layout, TileId};
use sinking_isle::cards::{standard_treasure_cards, Deck, TreasureCard};
use sinking_isle::core::{Difficulty, GameRng};
use sinking_isle::rules::new_game;
use sinking_isle::water::{flood_draws_at, WaterMeter, MAX_WATER_LEVEL};

/// Deck operations in terms a strategy can generate.
#[derive(Clone, Debug)]
enum DeckOp {
    Draw,
    Discard,
    Remove,
    Rise,
    Shuffle,
}

fn deck_op() -> impl Strategy<Value = DeckOp> {
    prop_oneof![
        4 => Just(DeckOp::Draw),
        3 => Just(DeckOp::Discard),
        1 => Just(DeckOp::Remove),
        1 => Just(DeckOp::Rise),
        1 => Just(DeckOp::Shuffle),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every card is always in exactly one place: a pile or the hand.
    #[test]
    fn prop_deck_conserves_cards(seed in any::<u64>(), ops in prop::collection::vec(deck_op(), 0..200)) {
        let mut rng = GameRng::new(seed);
        let cards = standard_treasure_cards();
        let total = cards.len();
        let mut deck = Deck::shuffled(cards, &mut rng);
        let mut hand: Vec<TreasureCard> = Vec::new();

        for op in ops {
            match op {
                DeckOp::Draw => hand.extend(deck.draw(&mut rng)),
                DeckOp::Discard => {
                    if let Some(card) = hand.pop() {
                        deck.discard(card);
                    }
                }
                DeckOp::Remove => {
                    if let Some(card) = hand.pop() {
                        deck.remove_from_play(card);
                    }
                }
                DeckOp::Rise => deck.rise_reshuffle(&mut rng),
                DeckOp::Shuffle => deck.shuffle_draw_pile(&mut rng),
            }
            prop_assert_eq!(deck.total() + hand.len(), total);
        }
    }

    /// Flood states only move forward, except shore-up's Flooded→Normal.
    #[test]
    fn prop_flood_transitions(seed in any::<u64>(), ops in prop::collection::vec((0u8..24, any::<bool>()), 0..120)) {
        let mut grid = standard_island(Layout::Shuffled, &mut GameRng::new(seed)).unwrap();
        for (id, shore) in ops {
            let tile = TileId(id);
            let before = grid.get(tile).unwrap().state;
            if shore {
                let changed = grid.shore_up(tile);
                let after = grid.get(tile).unwrap().state;
                prop_assert_eq!(changed, before == FloodState::Flooded);
                if changed {
                    prop_assert_eq!(after, FloodState::Normal);
                } else {
                    prop_assert_eq!(after, before);
                }
            } else if before == FloodState::Sunk {
                prop_assert!(grid.flood(tile).is_err());
                prop_assert_eq!(grid.get(tile).unwrap().state, FloodState::Sunk);
            } else {
                let after = grid.flood(tile).unwrap();
                prop_assert!(after > before);
                if after == FloodState::Sunk {
                    prop_assert!(grid.at(grid.get(tile).unwrap().coord).is_none());
                }
            }
        }
    }

    /// The water never drops, and higher water never floods less.
    #[test]
    fn prop_water_monotone(start in 1u8..=MAX_WATER_LEVEL, raises in 0usize..20) {
        let mut meter = WaterMeter::new(start);
        let mut level = meter.level();
        for _ in 0..raises {
            let next = meter.raise();
            prop_assert!(next >= level);
            prop_assert!(flood_draws_at(next) >= flood_draws_at(level));
            level = next;
        }
        prop_assert!(meter.level() <= MAX_WATER_LEVEL);
    }

    /// Whole games keep their books balanced and never un-end.
    #[test]
    fn prop_game_invariants(seed in any::<u64>(), players in 2usize..=4, turns in 1usize..25) {
        let names = ["A", "B", "C", "D"];
        let mut game = new_game(&names[..players], Difficulty::Normal, seed).unwrap();
        let mut level = game.water_level();

        for _ in 0..turns {
            if game.is_game_over() {
                let outcome = game.outcome();
                prop_assert!(game.advance_turn().is_err());
                prop_assert_eq!(game.outcome(), outcome);
                break;
            }
            game.advance_turn().unwrap();

            let in_hands: usize = game.players().map(|(_, a)| a.hand().len()).sum();
            prop_assert_eq!(game.treasure_deck().total() + in_hands, 28);
            prop_assert_eq!(game.flood_deck().total(), 24);
            prop_assert!(game.water_level() >= level);
            level = game.water_level();
            for (_, adventurer) in game.players() {
                prop_assert!(adventurer.hand().len() <= game.config().hand_limit);
            }
            let sunk = game.tiles().iter().filter(|t| t.state == FloodState::Sunk).count();
            prop_assert_eq!(sunk, game.flood_deck().removed().len());
        }
    }
}
