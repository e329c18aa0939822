//! Room actor: an isolated Tokio task that owns one duel.
//!
//! Each room runs in its own task and is driven by two event sources,
//! multiplexed with `select!`: the command channel (joins, actions,
//! disconnects) and the optional next-round deadline. Because both are
//! handled on the same task, room mutations never overlap — the duel's
//! phase guard plus this single-ownership model is what makes round
//! resolution exactly-once.
//!
//! The next-round deadline is owned by the actor, so tearing the room
//! down (disconnect, shutdown) invalidates any pending deal — a timer
//! can never fire into a destroyed room.

use std::collections::HashMap;

use pontoon_game::{Duel, DuelConfig, Outbox};
use pontoon_protocol::{
    PlayerId, Recipient, RoomId, RoomPhase, RoomSummary, ServerMessage,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};

use crate::RoomError;

/// Cosmetic variant label reported in room summaries.
const ROOM_MODE: &str = "standard";

/// Channel sender for delivering outbound events to a player.
///
/// This is the notifier seam: the connection handler owns the receiving
/// half and pumps it into the socket; the room only ever holds senders.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// An in-room action from a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Hit,
    Stand,
    Rematch,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a player in the room.
    Join {
        player: PlayerId,
        name: Option<String>,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Deliver a game action from a player.
    Action {
        player: PlayerId,
        action: PlayerAction,
    },

    /// A player's connection went away (or they left voluntarily).
    Disconnect { player: PlayerId },

    /// Request the lobby projection of this room.
    Summary {
        reply: oneshot::Sender<RoomSummary>,
    },

    /// Shut the room down.
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone — it's an
/// `mpsc::Sender` wrapper. The [`RoomRegistry`](crate::RoomRegistry)
/// holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique id.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Seats a player and waits for the outcome.
    pub async fn join(
        &self,
        player: PlayerId,
        name: Option<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Delivers a game action (fire-and-forget — illegal actions are
    /// dropped inside the actor without a reply).
    pub async fn action(
        &self,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { player, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Notifies the room that a player is gone. The room tears itself
    /// down after informing the remaining occupant.
    pub async fn disconnect(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Requests the lobby projection of this room.
    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Summary { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    duel: Duel,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// When the next round should be dealt, if a resolution is pending.
    deal_at: Option<Instant>,
    round_delay: std::time::Duration,
}

/// Pends until the deadline, or forever when none is armed.
async fn deal_deadline(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room opened");

        loop {
            let deal_at = self.deal_at;
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        RoomCommand::Join { player, name, sender, reply } => {
                            let result = self.handle_join(player, name, sender);
                            let _ = reply.send(result);
                        }
                        RoomCommand::Action { player, action } => {
                            self.handle_action(player, action);
                        }
                        RoomCommand::Disconnect { player } => {
                            if self.handle_disconnect(player) {
                                break;
                            }
                        }
                        RoomCommand::Summary { reply } => {
                            let _ = reply.send(self.summary());
                        }
                        RoomCommand::Shutdown => break,
                    }
                }
                _ = deal_deadline(deal_at) => {
                    self.deal_at = None;
                    let out = self.duel.next_round();
                    self.dispatch(out);
                    tracing::debug!(
                        room_id = %self.room_id,
                        round = self.duel.round(),
                        "next round dealt"
                    );
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room closed");
    }

    fn handle_join(
        &mut self,
        player: PlayerId,
        name: Option<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let ready = self.duel.join(player, name).map_err(|e| match e {
            pontoon_game::GameError::AlreadySeated(p) => {
                RoomError::AlreadyInRoom(p, self.room_id)
            }
            _ => RoomError::NotJoinable(self.room_id),
        })?;
        self.senders.insert(player, sender);
        tracing::info!(
            room_id = %self.room_id,
            %player,
            players = self.duel.players().len(),
            "player joined"
        );

        // Second occupant seated — the match starts immediately.
        if ready {
            let out = self.duel.start();
            self.dispatch(out);
            tracing::info!(room_id = %self.room_id, "duel started");
        }
        Ok(())
    }

    fn handle_action(&mut self, player: PlayerId, action: PlayerAction) {
        let result = match action {
            PlayerAction::Hit => self.duel.hit(player),
            PlayerAction::Stand => self.duel.stand(player),
            PlayerAction::Rematch => self.duel.rematch(player),
        };
        match result {
            Ok(out) => {
                self.dispatch(out);
                // A resolution without an elimination leaves the duel in
                // RoundResolving; arm the deal timer exactly once.
                if self.duel.phase() == RoomPhase::RoundResolving
                    && self.deal_at.is_none()
                {
                    self.deal_at = Some(Instant::now() + self.round_delay);
                    tracing::debug!(
                        room_id = %self.room_id,
                        round = self.duel.round(),
                        "round resolved, next deal scheduled"
                    );
                }
            }
            Err(e) => {
                // Illegal actions have no observable effect.
                tracing::debug!(
                    room_id = %self.room_id,
                    %player,
                    error = %e,
                    "action rejected"
                );
            }
        }
    }

    /// Returns `true` when the room should close. Any occupant leaving
    /// tears the room down — a duel never continues one-sided.
    fn handle_disconnect(&mut self, player: PlayerId) -> bool {
        if self.senders.remove(&player).is_none() {
            return false;
        }
        let survivor = self.duel.remove(player);
        tracing::info!(room_id = %self.room_id, %player, "player left");

        if let Some(id) = survivor {
            self.send_to(id, ServerMessage::OpponentLeft);
        }
        true
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id,
            players: self.duel.player_names(),
            state: self.duel.phase(),
            mode: ROOM_MODE.to_string(),
        }
    }

    /// Dispatches an outbox to the right recipients.
    fn dispatch(&self, out: Outbox) {
        for (recipient, msg) in out {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(msg.clone());
                    }
                }
                Recipient::Player(pid) => self.send_to(pid, msg),
            }
        }
    }

    /// Sends one event to one player. Silently drops if the receiver is
    /// gone (the player just disconnected).
    fn send_to(&self, player: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player) {
            let _ = sender.send(msg);
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: DuelConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room_id,
        round_delay: config.round_delay,
        duel: Duel::new(room_id, config),
        senders: HashMap::new(),
        receiver: rx,
        deal_at: None,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
