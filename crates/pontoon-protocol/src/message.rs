//! The inbound action vocabulary and outbound event vocabulary.
//!
//! All payloads are flat JSON records discriminated by a `type` field,
//! e.g. `{"type":"join_room","roomId":3,"name":"bob"}`. Field names are
//! camelCase on the wire; tags are snake_case.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Card, PlayerId, RoomId, RoomSummary};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// An action sent by a connected player.
///
/// Messages that fail to decode into this enum are dropped by the server
/// without a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Open a new room with the sender as its first occupant.
    CreateRoom { name: Option<String> },
    /// Join an existing waiting room as the second occupant.
    JoinRoom {
        room_id: RoomId,
        name: Option<String>,
    },
    /// Draw one card. Only legal for the current turn holder.
    Hit,
    /// Stop drawing for this round.
    Stand,
    /// Vote to restart the match after game-over.
    Rematch,
    /// Request the lobby room list.
    GetRooms,
    /// Abandon the current room.
    LeaveRoom,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A player's identity as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// The per-player view of a freshly dealt round.
///
/// Sent as the body of both `game_start` and `round_start`. The opponent's
/// hand is reported only as a card count — contents never leak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    pub you: PlayerRef,
    pub opponent: PlayerRef,
    pub your_hand: Vec<Card>,
    pub your_value: u32,
    pub opponent_card_count: usize,
    pub your_health: u32,
    pub opponent_health: u32,
    pub round: u32,
    /// Damage the loser of this round will take: `min(round, cap)`.
    pub damage: u32,
    pub current_turn_player_id: PlayerId,
}

/// An event delivered to a connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First message on any connection; carries the assigned id.
    Welcome { player_id: PlayerId },
    /// Reply to a successful `create_room`.
    RoomCreated { room_id: RoomId },
    /// Reply to `get_rooms`.
    RoomList { rooms: Vec<RoomSummary> },
    /// A fresh match started (both occupants seated, round 1 dealt).
    GameStart(RoundSnapshot),
    /// The next round of an ongoing match was dealt.
    RoundStart(RoundSnapshot),
    /// A player drew a card.
    HitResult {
        player_id: PlayerId,
        card: Card,
        new_value: u32,
    },
    /// A player stood for this round.
    StandResult { player_id: PlayerId },
    /// The turn passed to another player.
    TurnChange { current_turn_player_id: PlayerId },
    /// A round resolved. `winner_id` is absent on a draw.
    RoundEnd {
        winner_id: Option<PlayerId>,
        values: HashMap<PlayerId, u32>,
        your_health: u32,
        opponent_health: u32,
        damage: u32,
        round: u32,
    },
    /// A player's health reached zero; the match is over.
    GameOver { winner_id: PlayerId },
    /// The other occupant disconnected; the room is gone.
    OpponentLeft,
    /// A rejected action, delivered only to the offender.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, RoomPhase, Suit};

    #[test]
    fn test_client_message_create_room_json_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"create_room","name":"alice"}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                name: Some("alice".into())
            }
        );
    }

    #[test]
    fn test_client_message_join_room_json_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"join_room","roomId":7,"name":"bob"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                room_id: RoomId(7),
                name: Some("bob".into())
            }
        );
    }

    #[test]
    fn test_client_message_bare_actions() {
        for (raw, expected) in [
            (r#"{"type":"hit"}"#, ClientMessage::Hit),
            (r#"{"type":"stand"}"#, ClientMessage::Stand),
            (r#"{"type":"rematch"}"#, ClientMessage::Rematch),
            (r#"{"type":"get_rooms"}"#, ClientMessage::GetRooms),
            (r#"{"type":"leave_room"}"#, ClientMessage::LeaveRoom),
        ] {
            let msg: ClientMessage = serde_json::from_str(raw).unwrap();
            assert_eq!(msg, expected);
        }
    }

    #[test]
    fn test_client_message_unknown_type_fails() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"set_mode","mode":"shock"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_welcome_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(ServerMessage::Welcome {
                player_id: PlayerId(1),
            })
            .unwrap();
        assert_eq!(json["type"], "welcome");
        assert_eq!(json["playerId"], 1);
    }

    #[test]
    fn test_hit_result_json_format() {
        let msg = ServerMessage::HitResult {
            player_id: PlayerId(2),
            card: Card::new(Suit::Spades, Rank::Ace),
            new_value: 21,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "hit_result");
        assert_eq!(json["playerId"], 2);
        assert_eq!(json["card"]["rank"], "A");
        assert_eq!(json["newValue"], 21);
    }

    #[test]
    fn test_game_start_flattens_snapshot_fields() {
        let msg = ServerMessage::GameStart(RoundSnapshot {
            you: PlayerRef {
                id: PlayerId(1),
                name: "alice".into(),
            },
            opponent: PlayerRef {
                id: PlayerId(2),
                name: "bob".into(),
            },
            your_hand: vec![
                Card::new(Suit::Hearts, Rank::Ten),
                Card::new(Suit::Clubs, Rank::Seven),
            ],
            your_value: 17,
            opponent_card_count: 2,
            your_health: 7,
            opponent_health: 7,
            round: 1,
            damage: 1,
            current_turn_player_id: PlayerId(1),
        });
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "game_start");
        assert_eq!(json["yourValue"], 17);
        assert_eq!(json["opponentCardCount"], 2);
        assert_eq!(json["currentTurnPlayerId"], 1);
        // Opponent hand contents must never appear.
        assert!(json.get("opponentHand").is_none());
    }

    #[test]
    fn test_round_end_draw_has_null_winner() {
        let mut values = HashMap::new();
        values.insert(PlayerId(1), 18);
        values.insert(PlayerId(2), 18);
        let msg = ServerMessage::RoundEnd {
            winner_id: None,
            values,
            your_health: 7,
            opponent_health: 7,
            damage: 0,
            round: 3,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "round_end");
        assert!(json["winnerId"].is_null());
        assert_eq!(json["values"]["1"], 18);
        assert_eq!(json["round"], 3);
    }

    #[test]
    fn test_room_list_round_trip() {
        let msg = ServerMessage::RoomList {
            rooms: vec![RoomSummary {
                room_id: RoomId(1),
                players: vec!["alice".into()],
                state: RoomPhase::Waiting,
                mode: "standard".into(),
            }],
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_opponent_left_is_bare() {
        let json = serde_json::to_string(&ServerMessage::OpponentLeft).unwrap();
        assert_eq!(json, r#"{"type":"opponent_left"}"#);
    }
}
