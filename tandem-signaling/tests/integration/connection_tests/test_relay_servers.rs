use std::sync::Arc;
use tandem_core::RelayServer;
use tandem_signaling::{MemoryRoomStore, Role, SessionEvent, SessionPhase, SignalingConfig};

use crate::integration::{ROOM, create_peer, create_peer_with, init_tracing};
use crate::utils::{StubRelayFetcher, next_event};

fn with_relay_url() -> SignalingConfig {
    SignalingConfig {
        relay_credentials_url: Some("https://relay.test/v1alpha/iceconfig".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_relay_servers_are_attached_to_room_connected() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let servers = vec![RelayServer::new("turn:turn.test:3478", "user", "secret")];
    let fetcher = StubRelayFetcher::returning(servers.clone());
    let mut a = create_peer_with(Arc::new(store.clone()), fetcher, with_relay_url());

    a.session.connect_to_room(ROOM, false).await.unwrap();

    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::RoomConnected {
            role: Role::Initiator,
            relay_servers: servers,
        }
    );
    assert_eq!(a.fetcher.calls(), 1);
}

#[tokio::test]
async fn test_relay_fetch_failure_still_connects() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer_with(
        Arc::new(store.clone()),
        StubRelayFetcher::failing(),
        with_relay_url(),
    );

    a.session.connect_to_room(ROOM, false).await.unwrap();

    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::RoomConnected {
            role: Role::Initiator,
            relay_servers: vec![],
        }
    );
    assert_eq!(a.session.phase(), SessionPhase::Connected);
    assert_eq!(a.fetcher.calls(), 1);
}

#[tokio::test]
async fn test_no_relay_url_skips_fetch() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);

    a.session.connect_to_room(ROOM, false).await.unwrap();
    let _ = next_event(&mut a.events).await;

    assert_eq!(a.fetcher.calls(), 0);
}
