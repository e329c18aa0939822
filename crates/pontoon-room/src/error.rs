//! Error types for the room layer.

use pontoon_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist, is not waiting for players, or is full.
    /// One variant on purpose: the lobby shouldn't learn which of the
    /// three it was.
    #[error("room {0} cannot be joined")]
    NotJoinable(RoomId),

    /// The player already occupies a room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player occupies no room, so there is nowhere to route the
    /// action.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// The room's command channel is closed or full — the actor is
    /// gone or shutting down.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
