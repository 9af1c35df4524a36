use serde_json::json;
use tandem_core::{Description, PeerId};
use tandem_signaling::{MemoryRoomStore, RoomStore, SessionEvent};

use crate::integration::{create_peer, init_tracing, join, layout, room};
use crate::utils::{expect_quiet, next_event};

#[tokio::test]
async fn test_description_delivered_once() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    // A remote peer that writes straight into the store.
    let b = PeerId::from("remote-b");
    store
        .write(&layout().connected(&room(), &b), json!(true))
        .await
        .unwrap();
    store
        .write(
            &layout().description(&room(), &b),
            json!({"type": "offer", "description": "x"}),
        )
        .await
        .unwrap();

    // Every further change redelivers the same description.
    for _ in 0..5 {
        store
            .write(&layout().connected(&room(), &b), json!(true))
            .await
            .unwrap();
    }

    assert_eq!(
        next_event(&mut a.events).await,
        SessionEvent::RemoteDescriptionReceived {
            from: b,
            description: Description::offer("x"),
        }
    );
    expect_quiet(&mut a.events).await;
}
