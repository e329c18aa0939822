//! Per-connection handler: WebSocket upgrade, id assignment, and the
//! frame pump.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Upgrade the TCP stream to a WebSocket
//!   2. Assign a fresh `PlayerId`, send `welcome`
//!   3. Loop: inbound frames → decode → registry; room events → encode →
//!      socket
//!   4. On close (clean or not), remove the player from their room

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use pontoon_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use pontoon_room::{PlayerAction, PlayerSender};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::server::ServerState;
use crate::ServerError;

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let player_id =
        PlayerId(state.next_player_id.fetch_add(1, Ordering::Relaxed));
    tracing::info!(%player_id, %addr, "player connected");

    let (mut ws_tx, mut ws_rx) = ws.split();

    // The player's event channel. The sender half is handed to whatever
    // room the player joins; this task pumps the receiver into the socket.
    let (tx, mut rx) = mpsc::unbounded_channel();

    send(&mut ws_tx, &state, &ServerMessage::Welcome { player_id }).await?;

    let result =
        pump(&mut ws_tx, &mut ws_rx, &state, player_id, &tx, &mut rx).await;

    // Whatever ended the connection, the player leaves their room.
    state.registry.lock().await.remove_player(player_id).await;
    tracing::info!(%player_id, "player disconnected");
    result
}

/// The connection's main loop: multiplexes room events out and client
/// frames in until the socket closes.
async fn pump(
    ws_tx: &mut WsSink,
    ws_rx: &mut WsSource,
    state: &Arc<ServerState>,
    player_id: PlayerId,
    tx: &PlayerSender,
    rx: &mut mpsc::UnboundedReceiver<ServerMessage>,
) -> Result<(), ServerError> {
    loop {
        tokio::select! {
            // This task holds a sender clone, so recv() never yields None.
            Some(event) = rx.recv() => {
                send(ws_tx, state, &event).await?;
            }
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        dispatch(ws_tx, state, player_id, tx, text.as_bytes())
                            .await?;
                    }
                    Some(Ok(Message::Binary(data))) => {
                        dispatch(ws_tx, state, player_id, tx, &data).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(%player_id, "connection closed");
                        return Ok(());
                    }
                    Some(Ok(_)) => {} // ping/pong/frame
                    Some(Err(e)) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Decodes one inbound frame and routes it. Malformed frames are dropped
/// without a reply.
async fn dispatch(
    ws_tx: &mut WsSink,
    state: &Arc<ServerState>,
    player_id: PlayerId,
    tx: &PlayerSender,
    data: &[u8],
) -> Result<(), ServerError> {
    let msg: ClientMessage = match state.codec.decode(data) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "dropping bad frame");
            return Ok(());
        }
    };

    match msg {
        ClientMessage::CreateRoom { name } => {
            // Lock only for the registry call, drop before network I/O.
            let result = {
                let mut registry = state.registry.lock().await;
                registry.create_room(player_id, name, tx.clone()).await
            };
            match result {
                Ok(room_id) => {
                    send(ws_tx, state, &ServerMessage::RoomCreated { room_id })
                        .await?;
                }
                Err(e) => send_error(ws_tx, state, &e.to_string()).await?,
            }
        }

        ClientMessage::JoinRoom { room_id, name } => {
            let result = {
                let mut registry = state.registry.lock().await;
                registry
                    .join_room(player_id, room_id, name, tx.clone())
                    .await
            };
            // Success needs no ack of its own: the second seat starts
            // the duel and game_start arrives on the event channel.
            if let Err(e) = result {
                send_error(ws_tx, state, &e.to_string()).await?;
            }
        }

        ClientMessage::Hit | ClientMessage::Stand | ClientMessage::Rematch => {
            let action = match msg {
                ClientMessage::Hit => PlayerAction::Hit,
                ClientMessage::Stand => PlayerAction::Stand,
                _ => PlayerAction::Rematch,
            };
            let result = {
                let registry = state.registry.lock().await;
                registry.route_action(player_id, action).await
            };
            // Routing failures (not seated anywhere) get an error frame;
            // in-room rejections are the actor's business and stay silent.
            if let Err(e) = result {
                send_error(ws_tx, state, &e.to_string()).await?;
            }
        }

        ClientMessage::GetRooms => {
            let rooms = state.registry.lock().await.list_rooms().await;
            send(ws_tx, state, &ServerMessage::RoomList { rooms }).await?;
        }

        ClientMessage::LeaveRoom => {
            state.registry.lock().await.remove_player(player_id).await;
        }
    }

    Ok(())
}

/// Encodes one event and writes it as a text frame.
async fn send(
    ws_tx: &mut WsSink,
    state: &Arc<ServerState>,
    msg: &ServerMessage,
) -> Result<(), ServerError> {
    let frame = state.codec.encode(msg)?;
    ws_tx.send(Message::Text(frame.into())).await?;
    Ok(())
}

/// Sends an `error` event to this player only.
async fn send_error(
    ws_tx: &mut WsSink,
    state: &Arc<ServerState>,
    message: &str,
) -> Result<(), ServerError> {
    send(
        ws_tx,
        state,
        &ServerMessage::Error {
            message: message.to_string(),
        },
    )
    .await
}
