use tandem_core::Candidate;
use tandem_signaling::{MemoryRoomStore, SignalingError};

use crate::integration::{create_peer, init_tracing, join};

#[tokio::test]
async fn test_send_before_connect_fails() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let a = create_peer(&store);
    let candidate = Candidate::new(0, "audio", "c");

    assert_eq!(
        a.session.send_offer_description("early").await,
        Err(SignalingError::NotConnected)
    );
    assert_eq!(
        a.session.send_local_candidate(candidate.clone()).await,
        Err(SignalingError::NotConnected)
    );
    assert_eq!(
        a.session.retract_local_candidates(&[candidate]).await,
        Err(SignalingError::NotConnected)
    );
    assert_eq!(store.value_at(&tandem_core::StorePath::parse("channels")), None);
}

#[tokio::test]
async fn test_send_after_disconnect_fails() {
    init_tracing();

    let store = MemoryRoomStore::new();
    let mut a = create_peer(&store);
    join(&mut a, &store).await;

    a.session.disconnect_from_room().await;

    assert_eq!(
        a.session.send_answer_description("late").await,
        Err(SignalingError::NotConnected)
    );
}
