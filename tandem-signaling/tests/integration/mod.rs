pub mod connection_tests;
pub mod disconnect_tests;

use std::sync::Arc;
use tandem_core::{PeerId, RoomId, RoomLayout};
use tandem_signaling::{
    MemoryRoomStore, Role, RoomStore, SessionEvent, SessionEvents, SignalingConfig,
    SignalingSession,
};
use tracing::Level;

use crate::utils::{StubRelayFetcher, next_event, wait_for_path};

pub const ROOM: &str = "r1";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestPeer {
    pub session: SignalingSession,
    pub events: SessionEvents,
    pub fetcher: StubRelayFetcher,
}

pub fn create_peer(store: &MemoryRoomStore) -> TestPeer {
    create_peer_with(
        Arc::new(store.clone()),
        StubRelayFetcher::default(),
        SignalingConfig::default(),
    )
}

pub fn create_peer_with(
    store: Arc<dyn RoomStore>,
    fetcher: StubRelayFetcher,
    config: SignalingConfig,
) -> TestPeer {
    let (session, events) = SignalingSession::new(store, Arc::new(fetcher.clone()), config);
    TestPeer {
        session,
        events,
        fetcher,
    }
}

pub fn layout() -> RoomLayout {
    RoomLayout::default()
}

pub fn room() -> RoomId {
    RoomId::from(ROOM)
}

/// Connect `peer` to the test room, wait for `RoomConnected` and for its record to land.
pub async fn join(peer: &mut TestPeer, store: &MemoryRoomStore) -> (PeerId, Role) {
    let id = peer
        .session
        .connect_to_room(ROOM, false)
        .await
        .expect("connect_to_room failed");

    let role = match next_event(&mut peer.events).await {
        SessionEvent::RoomConnected { role, .. } => role,
        other => panic!("Expected RoomConnected, got {:?}", other),
    };

    wait_for_path(store, &layout().connected(&room(), &id), true).await;
    (id, role)
}
