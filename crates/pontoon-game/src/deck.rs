//! A shuffled, finite, consumable deck.

use pontoon_protocol::{Card, Rank, Suit};
use rand::seq::SliceRandom;

use crate::GameError;

/// An ordered, consumable sequence of cards, built fresh each round.
///
/// Cards are drawn from the back of the vector, so every card is dealt
/// at most once. Drawing from an empty deck is an error value, never a
/// panic — callers treat it as a no-op turn.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a full 52-card deck and shuffles it uniformly.
    pub fn shuffled() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    /// Builds a deck with a known order. The last card is drawn first.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    /// Number of cards left.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shuffled_deck_has_52_unique_cards() {
        let mut deck = Deck::shuffled();
        let mut seen = HashSet::new();
        while let Ok(card) = deck.draw() {
            assert!(seen.insert(card), "card {card} dealt twice");
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn test_draw_consumes() {
        let mut deck = Deck::shuffled();
        assert_eq!(deck.remaining(), 52);
        deck.draw().unwrap();
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn test_empty_deck_is_an_error_not_a_panic() {
        let mut deck = Deck::stacked(Vec::new());
        assert!(matches!(deck.draw(), Err(GameError::DeckExhausted)));
    }

    #[test]
    fn test_stacked_deck_draws_from_the_back() {
        let bottom = Card::new(Suit::Hearts, Rank::Two);
        let top = Card::new(Suit::Spades, Rank::Ace);
        let mut deck = Deck::stacked(vec![bottom, top]);
        assert_eq!(deck.draw().unwrap(), top);
        assert_eq!(deck.draw().unwrap(), bottom);
    }
}
