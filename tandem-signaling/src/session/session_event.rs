use crate::error::StoreError;
use crate::snapshot::Role;
use tandem_core::{Candidate, Description, PeerId, RelayServer};
use tokio::sync::mpsc;

/// Everything the negotiation engine hears from a session, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Emitted once per session, after the first room snapshot.
    RoomConnected {
        role: Role,
        relay_servers: Vec<RelayServer>,
    },
    RemoteDescriptionReceived {
        from: PeerId,
        description: Description,
    },
    RemoteCandidateReceived {
        from: PeerId,
        candidate: Candidate,
    },
    /// The store subscription reported a failure. The session keeps its state and does not resubscribe.
    StoreDeliveryFailed(StoreError),
}

pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;
