use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{Candidate, Description, PeerId};
use tandem_signaling::{MemoryRoomStore, Role, RoomStore, SessionEvent, SessionPhase};

use crate::integration::{create_peer, init_tracing, join, layout, room};
use crate::utils::{drain_events, expect_quiet, next_event, wait_for_path};

#[tokio::test]
async fn test_disconnect_removes_record_and_subscription() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    let (a_id, _) = join(&mut a, &store).await;

    a.session.send_offer_description("sdp").await.unwrap();
    a.session
        .send_local_candidate(Candidate::new(0, "audio", "c"))
        .await
        .unwrap();

    a.session.disconnect_from_room().await;

    assert_eq!(a.session.phase(), SessionPhase::Disconnected);
    assert_eq!(a.session.local_id().await, None);
    assert_eq!(store.subscriber_count(), 0);
    wait_for_path(&store, &layout().peer(&room(), &a_id), false).await;

    // Second call is a no-op.
    a.session.disconnect_from_room().await;
    expect_quiet(&mut a.events).await;
}

#[tokio::test]
async fn test_reconnect_starts_with_empty_ledger() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let b = PeerId::from("remote-b");
    store
        .write(
            &layout().description(&room(), &b),
            json!({"type": "offer", "description": "x"}),
        )
        .await
        .unwrap();

    let mut a = create_peer(&store);
    let (first_id, first_role) = join(&mut a, &store).await;
    assert_eq!(first_role, Role::Responder);

    let offer = SessionEvent::RemoteDescriptionReceived {
        from: b.clone(),
        description: Description::offer("x"),
    };
    assert_eq!(next_event(&mut a.events).await, offer);

    a.session.disconnect_from_room().await;
    wait_for_path(&store, &layout().peer(&room(), &first_id), false).await;

    let (second_id, second_role) = join(&mut a, &store).await;
    assert_ne!(first_id, second_id);
    assert_eq!(second_role, Role::Responder);

    let events = drain_events(&mut a.events).await;
    assert_eq!(events, vec![offer]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sends_racing_disconnect_leave_no_record() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    let (a_id, _) = join(&mut a, &store).await;

    let session = Arc::new(a.session);
    let sender = {
        let session = session.clone();
        tokio::spawn(async move {
            let mut sent = 0u32;
            while session
                .send_local_candidate(Candidate::new(0, "audio", format!("c-{}", sent)))
                .await
                .is_ok()
            {
                sent += 1;
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            sent
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    session.disconnect_from_room().await;
    assert!(sender.await.unwrap() > 0);

    // A write queued behind the delete would bring back a record without `connected`.
    let peer_path = layout().peer(&room(), &a_id);
    wait_for_path(&store, &peer_path, false).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.value_at(&peer_path), None);
}
