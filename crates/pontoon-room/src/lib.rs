//! Room lifecycle for Pontoon.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns one
//! [`Duel`](pontoon_game::Duel). The outside world talks to it through
//! an mpsc channel: all mutations of a room happen inside its actor
//! loop, one message at a time, which is what makes the turn-legality
//! and exactly-once-resolution invariants cheap to hold.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/destroys rooms, pairs players into them
//! - [`RoomHandle`] — sends commands to a running room actor
//! - [`PlayerAction`] — the in-room action vocabulary (hit/stand/rematch)
//! - [`PlayerSender`] — a player's outbound event channel (the notifier
//!   seam; owned by the connection handler, referenced by the room)

mod actor;
mod error;
mod registry;

pub use actor::{PlayerAction, PlayerSender, RoomHandle};
pub use error::RoomError;
pub use registry::RoomRegistry;
