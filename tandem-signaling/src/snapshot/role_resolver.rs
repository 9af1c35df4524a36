use serde::{Deserialize, Serialize};
use std::fmt;
use tandem_core::{PeerId, RoomSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Undetermined,
    /// Sends the offer.
    Initiator,
    /// Answers the initiator's offer.
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Undetermined => write!(f, "undetermined"),
            Role::Initiator => write!(f, "initiator"),
            Role::Responder => write!(f, "responder"),
        }
    }
}

/// Picks the local role from the first snapshot seen after subscribing.
///
/// Stale records left behind by a peer that never disconnected cleanly look like a live
/// participant and make the newcomer a responder.
pub struct RoleResolver;

impl RoleResolver {
    pub fn resolve(first_snapshot: &RoomSnapshot, local: &PeerId) -> Role {
        if !first_snapshot.exists() {
            return Role::Initiator;
        }

        if first_snapshot.others(local).next().is_none() {
            return Role::Initiator;
        }

        Role::Responder
    }
}
