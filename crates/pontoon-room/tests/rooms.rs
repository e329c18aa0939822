//! Integration tests for the room layer: registry bookkeeping and the
//! full actor event flow, including the delayed next-round deal.

use std::time::Duration;

use pontoon_game::DuelConfig;
use pontoon_protocol::{PlayerId, RoomId, RoomPhase, ServerMessage};
use pontoon_room::{PlayerAction, PlayerSender, RoomRegistry};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

/// Creates a dummy player sender (receiver is dropped immediately).
fn dummy_sender() -> PlayerSender {
    mpsc::unbounded_channel().0
}

/// Registry with a short inter-round delay so redeal tests stay fast.
fn registry() -> RoomRegistry {
    RoomRegistry::new(DuelConfig {
        round_delay: Duration::from_millis(50),
        ..DuelConfig::default()
    })
}

type Rx = mpsc::UnboundedReceiver<ServerMessage>;

/// Discards everything currently queued for a player.
async fn drain(rx: &mut Rx) {
    tokio::time::sleep(Duration::from_millis(10)).await;
    while rx.try_recv().is_ok() {}
}

/// Creates a room with two connected players and returns their inboxes.
async fn full_room(reg: &mut RoomRegistry) -> (RoomId, Rx, Rx) {
    let (tx1, rx1) = mpsc::unbounded_channel();
    let (tx2, rx2) = mpsc::unbounded_channel();
    let room = reg.create_room(pid(1), None, tx1).await.unwrap();
    reg.join_room(pid(2), room, None, tx2).await.unwrap();
    (room, rx1, rx2)
}

// =========================================================================
// Registry bookkeeping
// =========================================================================

#[tokio::test]
async fn test_create_room_seats_creator() {
    let mut reg = registry();
    let room = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();

    assert_eq!(reg.room_count(), 1);
    assert_eq!(reg.player_room(&pid(1)), Some(room));
}

#[tokio::test]
async fn test_create_room_returns_unique_ids() {
    let mut reg = registry();
    let r1 = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();
    let r2 = reg.create_room(pid(2), None, dummy_sender()).await.unwrap();
    assert_ne!(r1, r2);
    assert_eq!(reg.room_count(), 2);
}

#[tokio::test]
async fn test_room_ids_are_registry_scoped_not_process_global() {
    // Each registry owns its id generator, so a fresh registry hands
    // out the same first id instead of continuing a process-wide count.
    let mut reg_a = registry();
    let mut reg_b = registry();
    let first_a = reg_a.create_room(pid(1), None, dummy_sender()).await.unwrap();
    let first_b = reg_b.create_room(pid(2), None, dummy_sender()).await.unwrap();
    assert_eq!(first_a, first_b);
    assert_eq!(first_a, RoomId(1));
}

#[tokio::test]
async fn test_join_room_success() {
    let mut reg = registry();
    let room = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();

    reg.join_room(pid(2), room, None, dummy_sender())
        .await
        .unwrap();

    assert_eq!(reg.player_room(&pid(2)), Some(room));
}

#[tokio::test]
async fn test_join_room_not_found() {
    let mut reg = registry();
    let result = reg
        .join_room(pid(1), RoomId(9999), None, dummy_sender())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_one_room_at_a_time() {
    let mut reg = registry();
    let r1 = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();
    let _r2 = reg.create_room(pid(2), None, dummy_sender()).await.unwrap();

    let result = reg.join_room(pid(2), r1, None, dummy_sender()).await;
    assert!(result.is_err(), "player should not join two rooms");
}

#[tokio::test]
async fn test_cannot_join_running_room() {
    let mut reg = registry();
    let room = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();
    reg.join_room(pid(2), room, None, dummy_sender())
        .await
        .unwrap();

    // Duel auto-starts with the second seat; a third join must fail.
    let result = reg.join_room(pid(3), room, None, dummy_sender()).await;
    assert!(result.is_err(), "should not join a running duel");
}

#[tokio::test]
async fn test_route_action_not_in_room() {
    let reg = registry();
    let result = reg.route_action(pid(1), PlayerAction::Hit).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_remove_player_retires_room() {
    let mut reg = registry();
    let (_room, _rx1, _rx2) = full_room(&mut reg).await;

    reg.remove_player(pid(1)).await;

    assert_eq!(reg.room_count(), 0);
    assert_eq!(reg.player_room(&pid(1)), None);
    // The survivor's lobby mapping is cleared with the room.
    assert_eq!(reg.player_room(&pid(2)), None);
}

#[tokio::test]
async fn test_remove_unknown_player_is_noop() {
    let mut reg = registry();
    let _room = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();

    reg.remove_player(pid(99)).await;

    assert_eq!(reg.room_count(), 1);
}

#[tokio::test]
async fn test_list_rooms_projects_every_room_with_its_state() {
    let mut reg = registry();
    let r1 = reg.create_room(pid(1), None, dummy_sender()).await.unwrap();
    let (r2, _rx1, _rx2) = full_room_with(&mut reg, 10, 11).await;

    // The lobby shows waiting AND running rooms, each under its own
    // lifecycle state.
    let rooms = reg.list_rooms().await;
    assert_eq!(rooms.len(), 2);

    let waiting = rooms.iter().find(|s| s.room_id == r1).unwrap();
    assert_eq!(waiting.state, RoomPhase::Waiting);

    let running = rooms.iter().find(|s| s.room_id == r2).unwrap();
    assert_eq!(running.state, RoomPhase::Running);
}

#[tokio::test]
async fn test_list_rooms_empty() {
    let reg = registry();
    assert!(reg.list_rooms().await.is_empty());
}

#[tokio::test]
async fn test_room_summary_carries_names() {
    let mut reg = registry();
    let _room = reg
        .create_room(pid(1), Some("Ada".into()), dummy_sender())
        .await
        .unwrap();

    let rooms = reg.list_rooms().await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].players, vec!["Ada".to_string()]);
    assert_eq!(rooms[0].mode, "standard");
}

/// Like [`full_room`] but with explicit player ids.
async fn full_room_with(
    reg: &mut RoomRegistry,
    a: u64,
    b: u64,
) -> (RoomId, Rx, Rx) {
    let (tx1, rx1) = mpsc::unbounded_channel();
    let (tx2, rx2) = mpsc::unbounded_channel();
    let room = reg.create_room(pid(a), None, tx1).await.unwrap();
    reg.join_room(pid(b), room, None, tx2).await.unwrap();
    (room, rx1, rx2)
}

// =========================================================================
// Event flow through the actor
// =========================================================================

#[tokio::test]
async fn test_game_start_broadcast_on_second_join() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;

    tokio::time::sleep(Duration::from_millis(10)).await;

    let msg1 = rx1.try_recv().expect("player 1 should get game_start");
    let msg2 = rx2.try_recv().expect("player 2 should get game_start");

    let (ServerMessage::GameStart(s1), ServerMessage::GameStart(s2)) =
        (msg1, msg2)
    else {
        panic!("expected game_start for both players");
    };

    // Each snapshot is from its recipient's point of view.
    assert_eq!(s1.you.id, pid(1));
    assert_eq!(s2.you.id, pid(2));
    assert_eq!(s1.opponent.id, pid(2));
    assert_eq!(s1.round, 1);
    assert_eq!(s1.your_health, 7);
    assert_eq!(s1.opponent_health, 7);
    assert_eq!(s1.your_hand.len(), 2);
    assert_eq!(s1.opponent_card_count, 2);
    // The creator opens every round.
    assert_eq!(s1.current_turn_player_id, pid(1));
    assert_eq!(s2.current_turn_player_id, pid(1));
}

#[tokio::test]
async fn test_hit_broadcasts_hit_result() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;
    drain(&mut rx1).await;
    drain(&mut rx2).await;

    reg.route_action(pid(1), PlayerAction::Hit).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Whatever follows (turn change or a bust resolution), the draw
    // itself reaches both players first.
    let msg1 = rx1.try_recv().expect("player 1 should get hit_result");
    let msg2 = rx2.try_recv().expect("player 2 should get hit_result");
    assert!(matches!(msg1, ServerMessage::HitResult { player_id, .. } if player_id == pid(1)));
    assert!(matches!(msg2, ServerMessage::HitResult { player_id, .. } if player_id == pid(1)));
}

#[tokio::test]
async fn test_out_of_turn_action_is_silent() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;
    drain(&mut rx1).await;
    drain(&mut rx2).await;

    // Player 2 acts while player 1 holds the turn: dropped, no error
    // frame, no state change observable by either player.
    reg.route_action(pid(2), PlayerAction::Hit).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(rx1.try_recv().is_err());
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn test_both_stand_resolves_then_redeals_after_delay() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;
    drain(&mut rx1).await;
    drain(&mut rx2).await;

    reg.route_action(pid(1), PlayerAction::Stand).await.unwrap();
    reg.route_action(pid(2), PlayerAction::Stand).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // stand, turn change, stand, then one round_end per player.
    let mut saw_round_end = false;
    while let Ok(msg) = rx1.try_recv() {
        if let ServerMessage::RoundEnd { round, .. } = msg {
            assert_eq!(round, 1);
            saw_round_end = true;
        }
    }
    assert!(saw_round_end, "player 1 should see the round resolve");

    // Past the configured delay the next round is dealt automatically.
    tokio::time::sleep(Duration::from_millis(80)).await;
    let mut saw_round_start = false;
    while let Ok(msg) = rx2.try_recv() {
        if let ServerMessage::RoundStart(snap) = msg {
            assert_eq!(snap.round, 2);
            assert_eq!(snap.your_hand.len(), 2);
            saw_round_start = true;
        }
    }
    assert!(saw_round_start, "round 2 should deal after the delay");
}

#[tokio::test]
async fn test_survivor_is_told_opponent_left() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;
    drain(&mut rx1).await;
    drain(&mut rx2).await;

    reg.remove_player(pid(1)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let msg = rx2.try_recv().expect("survivor should be notified");
    assert!(matches!(msg, ServerMessage::OpponentLeft));
}

#[tokio::test]
async fn test_no_redeal_after_room_retired() {
    let mut reg = registry();
    let (_room, mut rx1, mut rx2) = full_room(&mut reg).await;
    drain(&mut rx1).await;
    drain(&mut rx2).await;

    // Resolve round 1, then tear the room down before the deal fires.
    reg.route_action(pid(1), PlayerAction::Stand).await.unwrap();
    reg.route_action(pid(2), PlayerAction::Stand).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    reg.remove_player(pid(1)).await;
    drain(&mut rx2).await;

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(
        rx2.try_recv().is_err(),
        "a retired room must not deal another round"
    );
}
