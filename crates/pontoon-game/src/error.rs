//! Error types for the game core.

use pontoon_protocol::{PlayerId, RoomPhase};

/// Why an action against a duel was rejected.
///
/// None of these are fatal: the room actor logs them at debug level and
/// the offending action simply has no effect.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    /// The deck ran out of cards. The hit is a no-op turn.
    #[error("deck is exhausted")]
    DeckExhausted,

    /// The acting player does not hold the turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The action is not legal in the duel's current phase, e.g. a hit
    /// while a round is resolving, or a rematch vote before game-over.
    #[error("action not allowed in phase {0}")]
    WrongPhase(RoomPhase),

    /// The player is not an occupant of this duel.
    #[error("player {0} is not seated at this duel")]
    NotSeated(PlayerId),

    /// Both seats are taken.
    #[error("duel already has two players")]
    DuelFull,

    /// The player is already seated here.
    #[error("player {0} is already seated")]
    AlreadySeated(PlayerId),
}
