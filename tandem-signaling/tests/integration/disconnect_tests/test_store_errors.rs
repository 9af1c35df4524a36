use serde_json::json;
use std::sync::Arc;
use tandem_core::{Description, PeerId};
use tandem_signaling::{
    MemoryRoomStore, RoomStore, SessionEvent, SessionPhase, SignalingConfig, StoreError,
};

use crate::integration::{ROOM, create_peer, create_peer_with, init_tracing, join, layout, room};
use crate::utils::{RefusingStore, StubRelayFetcher, expect_quiet, next_event};

#[tokio::test]
async fn test_delivery_error_is_reported_and_session_continues() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    store.inject_delivery_error(
        &layout().room(&room()),
        StoreError::Delivery("connection reset".into()),
    );
    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::StoreDeliveryFailed(StoreError::Delivery("connection reset".into()))
    );
    assert_eq!(a.session.phase(), SessionPhase::Connected);

    let b = PeerId::from("remote-b");
    store
        .write(
            &layout().description(&room(), &b),
            json!({"type": "offer", "description": "after-error"}),
        )
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::RemoteDescriptionReceived {
            from: b,
            description: Description::offer("after-error"),
        }
    );
}

#[tokio::test]
async fn test_closed_subscription_is_reported() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    store.close_subscriptions(&layout().room(&room()));

    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::StoreDeliveryFailed(StoreError::SubscriptionClosed)
    );
    expect_quiet(&mut a.events).await;
    assert_eq!(a.session.phase(), SessionPhase::Connected);
}

#[tokio::test]
async fn test_refused_subscription_is_reported() {
    init_tracing();

    let store = RefusingStore::default();
    let mut a = create_peer_with(
        Arc::new(store.clone()),
        StubRelayFetcher::default(),
        SignalingConfig::default(),
    );

    a.session.connect_to_room(ROOM, false).await.unwrap();

    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::StoreDeliveryFailed(StoreError::Unavailable("permission denied".into()))
    );
    assert_eq!(a.session.phase(), SessionPhase::Connecting);

    a.session.disconnect_from_room().await;
    assert_eq!(a.session.phase(), SessionPhase::Disconnected);
}
