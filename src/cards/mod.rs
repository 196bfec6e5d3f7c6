//! Deck manager: treasure and flood decks, and the treasures themselves.
//!
//! - `card`: treasure/special cards and flood cards
//! - `deck`: generic draw/discard piles with both reshuffle rules
//! - `treasure`: capture state per treasure

pub mod card;
pub mod deck;
pub mod treasure;

pub use card::{flood_cards_for, standard_treasure_cards, FloodCard, TreasureCard, TreasureType};
pub use deck::Deck;
pub use treasure::{treasures_for, Treasure};
