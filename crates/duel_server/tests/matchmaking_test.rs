//! Matchmaking through the coordinator.

use duel_server::{GameMode, RoomCoordinator, RoomStatus, ServerConfig, ServerEvent};
use duel_tictactoe::Player;

fn coordinator() -> RoomCoordinator {
    RoomCoordinator::new(&ServerConfig::default().with_rng_seed(Some(1)))
}

#[test]
fn test_pairs_first_two_and_queues_third() {
    let coordinator = coordinator();
    let mut a = coordinator.connect("a");
    let mut b = coordinator.connect("b");
    let mut c = coordinator.connect("c");

    assert_eq!(coordinator.join_queue("a"), None);
    let room = coordinator.join_queue("b").expect("pair formed");
    assert_eq!(coordinator.join_queue("c"), None);

    assert_eq!(room.mode, GameMode::Classic);
    assert_eq!(room.status, RoomStatus::Active);
    assert_eq!(room.player1_id, "a");
    assert_eq!(room.player2_id.as_deref(), Some("b"));
    assert_eq!(room.current_turn, Player::X);
    assert_eq!(coordinator.stats().queued, 1);

    for rx in [&mut a, &mut b] {
        let _welcome = rx.try_recv().unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            ServerEvent::MatchFound(room.room_code.clone())
        );
        assert!(matches!(rx.try_recv().unwrap(), ServerEvent::State(_)));
    }
    let _welcome = c.try_recv().unwrap();
    assert!(c.try_recv().is_err());

    coordinator.apply_move("a", 4).unwrap();
}

#[test]
fn test_join_is_idempotent() {
    let coordinator = coordinator();
    assert_eq!(coordinator.join_queue("a"), None);
    assert_eq!(coordinator.join_queue("a"), None);
    assert_eq!(coordinator.stats().queued, 1);
    assert_eq!(coordinator.stats().rooms, 0);
}

#[test]
fn test_leave_and_disconnect_remove_from_queue() {
    let coordinator = coordinator();
    coordinator.join_queue("a");
    assert!(coordinator.leave_queue("a"));
    assert!(!coordinator.leave_queue("a"));

    coordinator.join_queue("b");
    coordinator.disconnect("b");
    assert_eq!(coordinator.stats().queued, 0);

    coordinator.join_queue("c");
    assert_eq!(coordinator.join_queue("d").map(|room| room.player1_id), Some("c".to_string()));
}
