use super::*;
use crate::protocol::{Role, STATUS_WAITING};
use std::collections::HashSet;
use tokio::sync::mpsc::error::TryRecvError;

type Inbox = mpsc::Receiver<Arc<ServerMessage>>;

async fn connect(server: &MatchmakingServer) -> (ClientId, Inbox) {
    let (sender, receiver) = mpsc::channel(16);
    let client_id = Uuid::new_v4();
    server.connect_client(client_id, sender).await;
    (client_id, receiver)
}

fn next_message(inbox: &mut Inbox) -> ServerMessage {
    let message = inbox.try_recv().expect("a queued message");
    (*message).clone()
}

fn assert_silent(inbox: &mut Inbox) {
    assert!(
        matches!(inbox.try_recv(), Err(TryRecvError::Empty)),
        "no message expected"
    );
}

fn expect_matched(inbox: &mut Inbox) -> (RoomId, Role) {
    match next_message(inbox) {
        ServerMessage::Matched { room, role } => (room, role),
        other => panic!("expected matched, got {other:?}"),
    }
}

/// Structural invariants that must hold between any two operations.
fn assert_invariants(state: &MatchState) {
    let queued: Vec<ClientId> = state.queue.iter().copied().collect();
    let unique: HashSet<ClientId> = queued.iter().copied().collect();
    assert_eq!(queued.len(), unique.len(), "queue holds duplicates");

    for client_id in &queued {
        let connection = state.registry.get(client_id).expect("queued client registered");
        assert!(connection.room_id.is_none(), "queued client is in a room");
        assert_eq!(connection.state, SessionState::Searching);
    }

    for room in state.rooms.values() {
        assert_ne!(room.initiator, room.responder, "degenerate room");
        for member in room.members() {
            let connection = state.registry.get(&member).expect("room member registered");
            assert_eq!(connection.room_id, Some(room.id));
            assert!(connection.state.in_room());
            assert!(!state.queue.contains(&member));
        }
    }
}

#[tokio::test]
async fn first_client_waits_second_client_initiates() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, mut a_inbox) = connect(&server).await;
    let (b, mut b_inbox) = connect(&server).await;

    server.find_partner(&a).await;
    assert_eq!(next_message(&mut a_inbox), ServerMessage::status(STATUS_WAITING));
    assert_eq!(server.session_state(&a).await, Some(SessionState::Searching));

    server.find_partner(&b).await;
    let (a_room, a_role) = expect_matched(&mut a_inbox);
    let (b_room, b_role) = expect_matched(&mut b_inbox);

    assert_eq!(a_room, b_room);
    assert_eq!(a_role, Role::Responder);
    assert_eq!(b_role, Role::Initiator);
    assert_eq!(server.session_state(&a).await, Some(SessionState::Matched));
    assert_eq!(server.session_state(&b).await, Some(SessionState::Matched));

    let room = server.get_room(&a).await.expect("room exists");
    assert_eq!(room.initiator, b);
    assert_eq!(room.responder, a);

    assert_invariants(&*server.state.lock().await);
}

#[tokio::test]
async fn repeated_find_partner_while_waiting_is_noop() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, mut a_inbox) = connect(&server).await;

    server.find_partner(&a).await;
    server.find_partner(&a).await;
    server.find_partner(&a).await;

    assert_eq!(next_message(&mut a_inbox), ServerMessage::status(STATUS_WAITING));
    assert_silent(&mut a_inbox);
    assert_eq!(server.waiting_clients().await, vec![a]);
}

#[tokio::test]
async fn find_partner_inside_room_is_noop() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, mut a_inbox) = connect(&server).await;
    let (b, mut b_inbox) = connect(&server).await;
    server.find_partner(&a).await;
    server.find_partner(&b).await;
    let _ = next_message(&mut a_inbox);
    let _ = expect_matched(&mut a_inbox);
    let _ = expect_matched(&mut b_inbox);

    server.find_partner(&a).await;
    server.find_partner(&b).await;

    assert_silent(&mut a_inbox);
    assert_silent(&mut b_inbox);
    assert!(server.waiting_clients().await.is_empty());
    assert_eq!(server.stats().await.active_rooms, 1);
}

#[tokio::test]
async fn pairing_follows_arrival_order() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, _a_inbox) = connect(&server).await;
    let (b, _b_inbox) = connect(&server).await;
    let (c, _c_inbox) = connect(&server).await;
    let (d, _d_inbox) = connect(&server).await;

    server.find_partner(&a).await;
    server.find_partner(&b).await;
    server.find_partner(&c).await;
    server.find_partner(&d).await;

    let first = server.get_room(&a).await.expect("a paired");
    let second = server.get_room(&c).await.expect("c paired");
    assert_eq!(first.other_member(&a), Some(b));
    assert_eq!(second.other_member(&c), Some(d));
    assert_ne!(first.id, second.id);
    assert_invariants(&*server.state.lock().await);
}

#[tokio::test]
async fn stale_queue_entry_is_skipped() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (b, mut b_inbox) = connect(&server).await;
    server.state.lock().await.queue.enqueue(Uuid::new_v4());

    server.find_partner(&b).await;

    assert_eq!(next_message(&mut b_inbox), ServerMessage::status(STATUS_WAITING));
    assert_eq!(server.waiting_clients().await, vec![b]);
    assert_eq!(server.stats().await.active_rooms, 0);
}

#[tokio::test]
async fn self_pairing_requeues_instead_of_forming_room() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, mut a_inbox) = connect(&server).await;

    {
        let mut state = server.state.lock().await;
        state.set_session_state(&a, SessionState::Searching);
        state.create_room(a, a);
        assert_invariants(&state);
    }

    assert_eq!(next_message(&mut a_inbox), ServerMessage::status(STATUS_WAITING));
    assert_eq!(server.waiting_clients().await, vec![a]);
    assert_eq!(server.stats().await.active_rooms, 0);
    assert_eq!(
        server
            .metrics()
            .snapshot()
            .matchmaking
            .self_pairings_prevented,
        1
    );
}

#[tokio::test]
async fn disconnect_while_waiting_leaves_queue() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, _a_inbox) = connect(&server).await;
    let (b, mut b_inbox) = connect(&server).await;

    server.find_partner(&a).await;
    server.disconnect_client(&a).await;
    assert!(server.waiting_clients().await.is_empty());

    server.find_partner(&b).await;
    assert_eq!(next_message(&mut b_inbox), ServerMessage::status(STATUS_WAITING));
    assert!(server.get_room(&b).await.is_none());
    assert_eq!(server.session_state(&a).await, None);
}

#[tokio::test]
async fn disconnect_inside_room_requeues_peer() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, mut a_inbox) = connect(&server).await;
    let (b, mut b_inbox) = connect(&server).await;
    server.find_partner(&a).await;
    server.find_partner(&b).await;
    let _ = next_message(&mut a_inbox);
    let _ = expect_matched(&mut a_inbox);
    let _ = expect_matched(&mut b_inbox);

    server.disconnect_client(&a).await;

    assert_eq!(next_message(&mut b_inbox), ServerMessage::PeerLeft);
    assert_eq!(next_message(&mut b_inbox), ServerMessage::status(STATUS_WAITING));
    assert_eq!(server.session_state(&b).await, Some(SessionState::Searching));
    assert_eq!(server.waiting_clients().await, vec![b]);
    assert_invariants(&*server.state.lock().await);
}

#[tokio::test]
async fn unregister_twice_is_harmless() {
    let server = MatchmakingServer::new(ServerConfig::default());
    let (a, _a_inbox) = connect(&server).await;
    server.find_partner(&a).await;

    server.unregister_client(&a).await;
    server.unregister_client(&a).await;

    let stats = server.stats().await;
    assert_eq!(stats.connected_clients, 0);
    assert_eq!(stats.waiting_clients, 0);
    assert_eq!(server.metrics().snapshot().connections.active_connections, 0);
    assert_eq!(server.metrics().snapshot().connections.disconnections, 1);
}

#[tokio::test]
async fn register_client_enforces_ip_limit_and_releases_on_unregister() {
    let config = ServerConfig {
        max_connections_per_ip: 1,
        ..ServerConfig::default()
    };
    let server = MatchmakingServer::new(config);
    let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();

    let (tx1, _rx1) = mpsc::channel(4);
    let first = server
        .register_client(tx1, addr)
        .await
        .expect("first registration succeeds");

    let (tx2, _rx2) = mpsc::channel(4);
    let err = server
        .register_client(tx2, addr)
        .await
        .expect_err("second client hits per-IP limit");
    match err {
        RegisterClientError::IpLimitExceeded { current, limit } => {
            assert_eq!(current, 1);
            assert_eq!(limit, 1);
        }
    }

    server.unregister_client(&first).await;

    let (tx3, _rx3) = mpsc::channel(4);
    server
        .register_client(tx3, addr)
        .await
        .expect("registrations resume after slot release");
}
