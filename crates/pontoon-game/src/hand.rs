//! Hand evaluation with soft/hard ace re-valuation.

use pontoon_protocol::{Card, Rank};

/// A hand value strictly above this is a bust.
pub const BUST_LIMIT: u32 = 21;

/// Base value of a rank: faces count 10, aces start at 11.
fn base_value(rank: Rank) -> u32 {
    match rank {
        Rank::Two => 2,
        Rank::Three => 3,
        Rank::Four => 4,
        Rank::Five => 5,
        Rank::Six => 6,
        Rank::Seven => 7,
        Rank::Eight => 8,
        Rank::Nine => 9,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        Rank::Ace => 11,
    }
}

/// Computes a hand's value.
///
/// Each ace starts at 11; while the total busts and an ace is still
/// counted high, one ace is demoted to 1. Demotion is maximal before a
/// bust is declared, and the result depends only on the multiset of
/// cards, not their order.
pub fn hand_value(hand: &[Card]) -> u32 {
    let mut total = 0;
    let mut high_aces = 0;
    for card in hand {
        total += base_value(card.rank);
        if card.rank == Rank::Ace {
            high_aces += 1;
        }
    }
    while total > BUST_LIMIT && high_aces > 0 {
        total -= 10;
        high_aces -= 1;
    }
    total
}
