//! Game core for Pontoon: deck, hand evaluation, and the duel state
//! machine.
//!
//! Everything in this crate is pure and synchronous — no channels, no
//! timers, no I/O. The room actor in `pontoon-room` drives a [`Duel`]
//! through player actions and dispatches the events each operation emits.
//!
//! # Key types
//!
//! - [`Duel`] — the aggregate for one two-player match
//! - [`Deck`] — a shuffled, consumable card sequence
//! - [`DuelConfig`] — health, damage cap, and round-delay settings
//! - [`GameError`] — why an action was rejected

mod config;
mod deck;
mod duel;
mod error;
mod hand;

pub use config::DuelConfig;
pub use deck::Deck;
pub use duel::{Duel, Outbox};
pub use error::GameError;
pub use hand::{hand_value, BUST_LIMIT};
