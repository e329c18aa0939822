//! Card wire types.
//!
//! Suits carry no scoring semantics — they exist so clients can render
//! cards. Scoring lives in `pontoon-game`, which owns the value table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four suits, serialized as the single-letter codes the
/// client renders (`"H"`, `"D"`, `"C"`, `"S"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "C")]
    Clubs,
    #[serde(rename = "S")]
    Spades,
}

impl Suit {
    /// All four suits, in deck-building order.
    pub const ALL: [Suit; 4] =
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    fn code(&self) -> &'static str {
        match self {
            Suit::Hearts => "H",
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Spades => "S",
        }
    }
}

/// A card rank, serialized as the short codes `"2"`–`"10"`, `"J"`,
/// `"Q"`, `"K"`, `"A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// All thirteen ranks, in deck-building order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    fn code(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// An immutable playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_json_shape() {
        let card = Card::new(Suit::Hearts, Rank::Ace);
        let json: serde_json::Value = serde_json::to_value(&card).unwrap();
        assert_eq!(json["suit"], "H");
        assert_eq!(json["rank"], "A");
    }

    #[test]
    fn test_card_round_trip() {
        let card = Card::new(Suit::Spades, Rank::Ten);
        let bytes = serde_json::to_vec(&card).unwrap();
        let decoded: Card = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card, decoded);
    }

    #[test]
    fn test_ten_uses_numeric_code() {
        let json = serde_json::to_string(&Rank::Ten).unwrap();
        assert_eq!(json, "\"10\"");
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Suit::Clubs, Rank::Queen).to_string(), "QC");
        assert_eq!(Card::new(Suit::Diamonds, Rank::Ten).to_string(), "10D");
    }

    #[test]
    fn test_rank_all_has_thirteen_distinct_entries() {
        let mut seen = std::collections::HashSet::new();
        for rank in Rank::ALL {
            seen.insert(rank);
        }
        assert_eq!(seen.len(), 13);
    }
}
