//! Wire protocol for Pontoon.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`PlayerId`], [`RoomId`], [`Card`], [`RoomPhase`], etc.) —
//!   identities and values that travel on the wire.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]) — the inbound
//!   action vocabulary and the outbound event vocabulary.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! The protocol layer sits between transport (raw frames) and the game
//! core. It doesn't know about connections or rooms — it only knows how
//! to describe actions and events.

mod card;
mod codec;
mod error;
mod message;
mod types;

pub use card::{Card, Rank, Suit};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{ClientMessage, PlayerRef, RoundSnapshot, ServerMessage};
pub use types::{PlayerId, Recipient, RoomId, RoomPhase, RoomSummary};
