use crate::snapshot::Role;
use std::fmt;
use tandem_core::PeerId;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Disconnected => write!(f, "disconnected"),
            SessionPhase::Connecting => write!(f, "connecting"),
            SessionPhase::Connected => write!(f, "connected"),
        }
    }
}

/// Worker-owned view of the current membership.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub local_id: PeerId,
    pub role: Role,
    pub subscribed: bool,
}

impl SessionState {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            role: Role::Undetermined,
            subscribed: false,
        }
    }
}

/// Values the handle reads without going through the worker.
pub(crate) struct SessionShared {
    pub phase: watch::Sender<SessionPhase>,
    pub role: watch::Sender<Role>,
}

impl SessionShared {
    pub fn new() -> Self {
        Self {
            phase: watch::Sender::new(SessionPhase::Disconnected),
            role: watch::Sender::new(Role::Undetermined),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Moves `from` to `to`; leaves any other phase untouched, in particular a disconnect
    /// that raced ahead of the worker.
    pub fn advance(&self, from: SessionPhase, to: SessionPhase) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == from {
                *phase = to;
                true
            } else {
                false
            }
        })
    }
}
