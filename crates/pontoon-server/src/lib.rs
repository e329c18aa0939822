//! # Pontoon server
//!
//! The network edge of the duel backend. Accepts WebSocket connections,
//! assigns player ids, and glues each connection to the room layer:
//! inbound frames decode to [`ClientMessage`](pontoon_protocol::ClientMessage)
//! and route through the [`RoomRegistry`](pontoon_room::RoomRegistry);
//! room events arrive on a per-player channel and are pumped back out as
//! text frames.

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{PontoonServer, PontoonServerBuilder};
