//! Room registry: creates, tracks, and routes players to duel rooms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use pontoon_game::DuelConfig;
use pontoon_protocol::{PlayerId, RoomId, RoomSummary};

use crate::actor::{spawn_room, PlayerAction, PlayerSender, RoomHandle};
use crate::RoomError;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all active rooms and which player sits in which room.
///
/// This is the entry point for room operations from the connection
/// layer. A player can be in at most ONE room at a time (key
/// invariant); the registry enforces it before any room actor is
/// touched.
pub struct RoomRegistry {
    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each player to the room they're currently in.
    player_rooms: HashMap<PlayerId, RoomId>,

    /// Id generator for this registry's rooms. Owned here so the
    /// registry carries all of its state — nothing lives in statics.
    next_room_id: AtomicU64,

    /// Duel rules handed to every new room.
    config: DuelConfig,
}

impl RoomRegistry {
    /// Creates an empty registry with the given duel rules.
    pub fn new(config: DuelConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            next_room_id: AtomicU64::new(1),
            config,
        }
    }

    /// Creates a new room and seats the creator in it.
    pub async fn create_room(
        &mut self,
        player: PlayerId,
        name: Option<String>,
        sender: PlayerSender,
    ) -> Result<RoomId, RoomError> {
        if let Some(current) = self.player_rooms.get(&player) {
            return Err(RoomError::AlreadyInRoom(player, *current));
        }

        let room_id =
            RoomId(self.next_room_id.fetch_add(1, Ordering::Relaxed));
        let handle =
            spawn_room(room_id, self.config.clone(), DEFAULT_CHANNEL_SIZE);
        handle.join(player, name, sender).await?;

        self.rooms.insert(room_id, handle);
        self.player_rooms.insert(player, room_id);
        tracing::info!(%room_id, %player, "room created");
        Ok(room_id)
    }

    /// Seats a player in an existing room.
    ///
    /// A room that has vanished reports as not joinable, same as a
    /// full or running one — the lobby distinction doesn't matter to
    /// the joining player.
    pub async fn join_room(
        &mut self,
        player: PlayerId,
        room_id: RoomId,
        name: Option<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player) {
            return Err(RoomError::AlreadyInRoom(player, *current));
        }

        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotJoinable(room_id))?;

        handle.join(player, name, sender).await?;
        self.player_rooms.insert(player, room_id);
        Ok(())
    }

    /// Routes a game action from a player to their current room.
    pub async fn route_action(
        &self,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(&player)
            .ok_or(RoomError::NotInRoom(player))?;

        let handle = self
            .rooms
            .get(room_id)
            .ok_or(RoomError::Unavailable(*room_id))?;

        handle.action(player, action).await
    }

    /// Removes a player and retires their room.
    ///
    /// Any departure ends the duel, so the whole room goes with the
    /// player; the surviving occupant is notified by the actor and
    /// dropped back to the lobby here. A no-op for players not seated
    /// anywhere.
    pub async fn remove_player(&mut self, player: PlayerId) {
        let Some(room_id) = self.player_rooms.remove(&player) else {
            return;
        };

        if let Some(handle) = self.rooms.remove(&room_id) {
            let _ = handle.disconnect(player).await;
        }

        // The survivor's lobby mapping goes too — their room is gone.
        self.player_rooms.retain(|_, rid| *rid != room_id);
        tracing::info!(%room_id, %player, "room retired");
    }

    /// Returns the room ID a player is currently in, if any.
    pub fn player_room(&self, player: &PlayerId) -> Option<RoomId> {
        self.player_rooms.get(player).copied()
    }

    /// Lists every active room with its current lifecycle state — a
    /// pure lobby projection, no filtering: clients see running and
    /// resolving rooms too, under their own `state`.
    ///
    /// Queries each room actor for its summary. Rooms that fail to
    /// respond (e.g., shutting down) are silently skipped.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(summary) = handle.summary().await {
                summaries.push(summary);
            }
        }
        summaries
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
