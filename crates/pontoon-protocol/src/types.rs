//! Identity newtypes, room lifecycle states, and event routing.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Assigned monotonically by the server when a connection is accepted.
/// A player id is not persistent: reconnecting yields a fresh one.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`,
/// which is what the client expects in fields like `playerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one two-player duel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting → Running → RoundResolving → Running   (next round)
///                          └─────────→ GameOver  (elimination)
/// ```
///
/// - **Waiting**: room exists with 0 or 1 occupants, accepting joins.
/// - **Running**: both occupants dealt in, the turn loop is active.
/// - **RoundResolving**: a round outcome is being processed. Entering
///   this state is the round-resolution guard: a second trigger for the
///   same round finds the room already out of `Running` and does nothing.
/// - **GameOver**: terminal — one player's health reached zero. Only
///   rematch votes are meaningful here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    Waiting,
    Running,
    RoundResolving,
    GameOver,
}

impl RoomPhase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if the turn loop is active.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Running => write!(f, "running"),
            Self::RoundResolving => write!(f, "round_resolving"),
            Self::GameOver => write!(f, "game_over"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies who should receive an outbound event.
///
/// The game core returns `(Recipient, ServerMessage)` pairs; the room
/// actor delivers each message to the channels this tag selects. Events
/// with per-player framing (own hand vs. opponent card count) use
/// `Player`, broadcasts use `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every occupant of the room.
    All,
    /// One specific player.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// RoomSummary
// ---------------------------------------------------------------------------

/// A read-only projection of one room for lobby display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// The room's unique id.
    pub room_id: RoomId,
    /// Display names of the current occupants.
    pub players: Vec<String>,
    /// Current lifecycle state.
    pub state: RoomPhase,
    /// Cosmetic variant label. Always `"standard"` for now.
    pub mode: String,
}
