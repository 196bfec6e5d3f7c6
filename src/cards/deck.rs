//! Draw/discard pile pairs.
//!
//! A `Deck` is an ordered draw pile plus an unordered discard pile. Cards
//! taken out of the game for good (the flood card of a sunk tile) go to a
//! third `removed` pile, so the deck can always account for every card it
//! was built with.
//!
//! The top of the draw pile is the end of the vec.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// One card category's piles.
///
/// ## Usage
///
/// ```
/// use sinking_isle::cards::Deck;
/// use sinking_isle::core::GameRng;
///
/// let mut rng = GameRng::new(1);
/// let mut deck = Deck::new(vec![1, 2, 3]);
///
/// assert_eq!(deck.draw(&mut rng), Some(3));
/// deck.discard(3);
/// deck.draw(&mut rng);
/// deck.draw(&mut rng);
///
/// // Draw pile is empty: the discard is reshuffled in.
/// assert_eq!(deck.draw(&mut rng), Some(3));
/// assert_eq!(deck.draw(&mut rng), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck<T> {
    draw: Vec<T>,
    discard: Vec<T>,
    removed: Vec<T>,
}

impl<T> Default for Deck<T> {
    fn default() -> Self {
        Self {
            draw: Vec::new(),
            discard: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T: Clone> Deck<T> {
    /// Create a deck whose draw pile is `cards` as given (last = top).
    #[must_use]
    pub fn new(cards: Vec<T>) -> Self {
        Self {
            draw: cards,
            ..Self::default()
        }
    }

    /// Create a deck and shuffle its draw pile.
    #[must_use]
    pub fn shuffled(cards: Vec<T>, rng: &mut GameRng) -> Self {
        let mut deck = Self::new(cards);
        deck.shuffle_draw_pile(rng);
        deck
    }

    /// Rebuild a deck from its three piles.
    #[must_use]
    pub fn from_piles(draw: Vec<T>, discard: Vec<T>, removed: Vec<T>) -> Self {
        Self { draw, discard, removed }
    }

    // === Drawing ===

    /// Draw the top card.
    ///
    /// An empty draw pile is refilled by shuffling the discard pile into it
    /// first. Returns `None` only when both piles are empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<T> {
        if self.draw.is_empty() && !self.discard.is_empty() {
            self.draw = std::mem::take(&mut self.discard);
            rng.shuffle(&mut self.draw);
            log::debug!("reshuffled {} discarded cards into an empty draw pile", self.draw.len());
        }
        self.draw.pop()
    }

    /// The card `draw` would return next, without reshuffling.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.draw.last()
    }

    /// Put a card on top of the draw pile.
    pub fn place_on_top(&mut self, card: T) {
        self.draw.push(card);
    }

    // === Discarding ===

    /// Add a card to the discard pile.
    pub fn discard(&mut self, card: T) {
        self.discard.push(card);
    }

    /// Take a card out of the game permanently.
    pub fn remove_from_play(&mut self, card: T) {
        self.removed.push(card);
    }

    // === Shuffling ===

    /// Shuffle the draw pile in place.
    pub fn shuffle_draw_pile(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw);
    }

    /// Shuffle the discard pile and stack it on top of the draw pile.
    ///
    /// Unlike the refill in `draw`, this happens whatever the draw pile
    /// holds, and keeps the existing draw pile underneath in its order.
    pub fn rise_reshuffle(&mut self, rng: &mut GameRng) {
        let mut returning = std::mem::take(&mut self.discard);
        rng.shuffle(&mut returning);
        self.draw.extend(returning);
    }

    // === Queries ===

    /// Draw pile, bottom first.
    #[must_use]
    pub fn draw_pile(&self) -> &[T] {
        &self.draw
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[T] {
        &self.discard
    }

    /// Cards out of the game for good.
    #[must_use]
    pub fn removed(&self) -> &[T] {
        &self.removed
    }

    /// Cards in all three piles (not counting cards held by players).
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.discard.len() + self.removed.len()
    }

    /// True when no card can be drawn, even after a reshuffle.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.draw.is_empty() && self.discard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_from_top() {
        let mut rng = GameRng::new(42);
        let mut deck = Deck::new(vec![1, 2, 3]);

        assert_eq!(deck.peek(), Some(&3));
        assert_eq!(deck.draw(&mut rng), Some(3));
        assert_eq!(deck.draw(&mut rng), Some(2));
        assert_eq!(deck.draw_pile(), &[1]);
    }

    #[test]
    fn test_empty_draw_reshuffles_discard() {
        let mut rng = GameRng::new(42);
        let mut deck: Deck<u32> = Deck::new(vec![]);
        for card in 0..10 {
            deck.discard(card);
        }

        let drawn = deck.draw(&mut rng);
        assert!(drawn.is_some());
        assert!(deck.discard_pile().is_empty());
        assert_eq!(deck.draw_pile().len(), 9);
    }

    #[test]
    fn test_exhausted_deck_returns_none() {
        let mut rng = GameRng::new(42);
        let mut deck: Deck<u32> = Deck::new(vec![]);
        assert!(deck.is_exhausted());
        assert_eq!(deck.draw(&mut rng), None);

        deck.remove_from_play(4);
        assert_eq!(deck.draw(&mut rng), None);
        assert_eq!(deck.total(), 1);
    }

    #[test]
    fn test_rise_reshuffle_stacks_on_top() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::new(vec![1, 2, 3]);
        deck.discard(10);
        deck.discard(11);
        deck.discard(12);

        deck.rise_reshuffle(&mut rng);

        // Old draw pile stays at the bottom, untouched.
        assert_eq!(&deck.draw_pile()[..3], &[1, 2, 3]);
        let mut top: Vec<_> = deck.draw_pile()[3..].to_vec();
        top.sort_unstable();
        assert_eq!(top, vec![10, 11, 12]);
        assert!(deck.discard_pile().is_empty());

        // The next three draws come from the returned discards.
        for _ in 0..3 {
            assert!(deck.draw(&mut rng).is_some_and(|c| c >= 10));
        }
    }

    #[test]
    fn test_rise_reshuffle_with_empty_discard_is_noop() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::new(vec![1, 2]);
        deck.rise_reshuffle(&mut rng);
        assert_eq!(deck.draw_pile(), &[1, 2]);
    }

    #[test]
    fn test_total_is_conserved() {
        let mut rng = GameRng::new(3);
        let mut deck = Deck::shuffled((0..24).collect::<Vec<u32>>(), &mut rng);
        let mut held = Vec::new();

        for round in 0..60 {
            if let Some(card) = deck.draw(&mut rng) {
                held.push(card);
            }
            if round % 3 == 0 {
                if let Some(card) = held.pop() {
                    deck.discard(card);
                }
            }
            if round % 11 == 0 {
                deck.rise_reshuffle(&mut rng);
            }
            if round % 17 == 0 {
                if let Some(card) = held.pop() {
                    deck.remove_from_play(card);
                }
            }
            assert_eq!(deck.total() + held.len(), 24);
        }
    }
}
