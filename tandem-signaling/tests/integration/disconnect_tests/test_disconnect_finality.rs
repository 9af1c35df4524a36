use serde_json::json;
use std::time::Duration;
use tandem_core::PeerId;
use tandem_signaling::{MemoryRoomStore, RoomStore, SessionPhase};

use crate::integration::{create_peer, init_tracing, join, layout, room};
use crate::utils::expect_quiet;

#[tokio::test]
async fn test_queued_snapshot_is_dropped_after_disconnect() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    // The write queues a snapshot for A's worker; on the single-threaded test runtime the
    // worker cannot run before disconnect starts.
    let b = PeerId::from("remote-b");
    store
        .write(
            &layout().description(&room(), &b),
            json!({"type": "offer", "description": "in-flight"}),
        )
        .await
        .unwrap();
    a.session.disconnect_from_room().await;

    assert_eq!(a.session.phase(), SessionPhase::Disconnected);
    assert!(a.events.try_recv().is_err());
    expect_quiet(&mut a.events).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_no_events_once_disconnect_returns() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    // A remote peer that keeps changing its description while A leaves.
    let writer_store = store.clone();
    let writer = tokio::spawn(async move {
        let b = PeerId::from("remote-b");
        let mut round = 0u64;
        loop {
            let _ = writer_store
                .write(
                    &layout().description(&room(), &b),
                    json!({"type": "offer", "description": format!("sdp-{}", round)}),
                )
                .await;
            round += 1;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    a.session.disconnect_from_room().await;

    // Whatever was sent before the call returned may still be buffered.
    while a.events.try_recv().is_ok() {}

    expect_quiet(&mut a.events).await;
    writer.abort();
    assert_eq!(a.session.phase(), SessionPhase::Disconnected);
}
