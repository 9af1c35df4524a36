use crate::config::SignalingConfig;
use crate::error::SignalingError;
use crate::relay::RelayCredentialFetcher;
use crate::session::outbound_publisher::OutboundPublisher;
use crate::session::session_command::SessionCommand;
use crate::session::session_worker::{SessionWorker, WorkerParts};
use crate::session::{SessionEvent, SessionEvents, SessionPhase, SessionShared, SessionState};
use crate::snapshot::Role;
use crate::store::RoomStore;
use std::sync::Arc;
use tandem_core::{Candidate, Description, PeerId, RoomId};
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

struct ActiveSession {
    room: RoomId,
    local_id: PeerId,
    outbound: OutboundPublisher,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    worker: JoinHandle<()>,
}

/// Signaling endpoint of one local peer.
///
/// A session joins at most one room at a time; after [`disconnect_from_room`] it can join
/// again with a fresh peer id. Events for every membership arrive on the single
/// [`SessionEvents`] channel returned by [`SignalingSession::new`].
///
/// [`disconnect_from_room`]: SignalingSession::disconnect_from_room
pub struct SignalingSession {
    store: Arc<dyn RoomStore>,
    fetcher: Arc<dyn RelayCredentialFetcher>,
    config: SignalingConfig,
    shared: Arc<SessionShared>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    active: Mutex<Option<ActiveSession>>,
}

impl SignalingSession {
    pub fn new(
        store: Arc<dyn RoomStore>,
        fetcher: Arc<dyn RelayCredentialFetcher>,
        config: SignalingConfig,
    ) -> (Self, SessionEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            store,
            fetcher,
            config,
            shared: Arc::new(SessionShared::new()),
            events_tx,
            active: Mutex::new(None),
        };
        (session, events_rx)
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.phase()
    }

    pub fn watch_phase(&self) -> watch::Receiver<SessionPhase> {
        self.shared.phase.subscribe()
    }

    pub fn role(&self) -> Role {
        *self.shared.role.borrow()
    }

    pub async fn local_id(&self) -> Option<PeerId> {
        self.active.lock().await.as_ref().map(|a| a.local_id.clone())
    }

    /// Starts joining `room_id` under a freshly generated peer id and returns that id.
    /// Membership completes asynchronously and is announced by [`SessionEvent::RoomConnected`].
    pub async fn connect_to_room(
        &self,
        room_id: impl Into<RoomId>,
        loopback: bool,
    ) -> Result<PeerId, SignalingError> {
        let room = room_id.into();
        if loopback {
            warn!("Loopback connection to room {} rejected", room);
            return Err(SignalingError::UnsupportedTopology);
        }

        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(SignalingError::AlreadyActive);
        }

        let local_id = PeerId::new();
        info!("Connecting to room {} as {}", room, local_id);

        self.shared.role.send_replace(Role::Undetermined);
        self.shared.phase.send_replace(SessionPhase::Connecting);

        let layout = self.config.layout();
        let outbound = OutboundPublisher::spawn(
            self.store.clone(),
            layout.clone(),
            room.clone(),
            local_id.clone(),
        );
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = SessionWorker::new(WorkerParts {
            room: room.clone(),
            room_path: layout.room(&room),
            state: SessionState::new(local_id.clone()),
            store: self.store.clone(),
            fetcher: self.fetcher.clone(),
            relay_url: self.config.relay_credentials_url.clone(),
            outbound: outbound.clone(),
            shared: self.shared.clone(),
            command_rx,
            events: self.events_tx.clone(),
        });

        *active = Some(ActiveSession {
            room,
            local_id: local_id.clone(),
            outbound,
            command_tx,
            worker: tokio::spawn(worker.run()),
        });

        Ok(local_id)
    }

    pub async fn send_offer_description(&self, sdp: impl Into<String>) -> Result<(), SignalingError> {
        self.send_description(Description::offer(sdp)).await
    }

    pub async fn send_answer_description(&self, sdp: impl Into<String>) -> Result<(), SignalingError> {
        self.send_description(Description::answer(sdp)).await
    }

    /// Publishes the local description, replacing any earlier one.
    pub async fn send_description(&self, description: Description) -> Result<(), SignalingError> {
        debug!("Sending {} description", description.kind);
        self.with_connected_outbound(|outbound| outbound.publish_description(&description))
            .await
    }

    pub async fn send_local_candidate(&self, candidate: Candidate) -> Result<(), SignalingError> {
        self.with_connected_outbound(|outbound| outbound.publish_candidate(&candidate))
            .await
    }

    /// Withdraws previously sent candidates. Candidates this session never sent are skipped.
    pub async fn retract_local_candidates(&self, candidates: &[Candidate]) -> Result<(), SignalingError> {
        let removed = self
            .with_connected_outbound(|outbound| outbound.retract_candidates(candidates))
            .await?;
        debug!("Retracted {} of {} candidates", removed, candidates.len());
        Ok(())
    }

    /// Leaves the current room. Once this returns no further events from that membership
    /// are delivered. Calling it while disconnected does nothing.
    pub async fn disconnect_from_room(&self) {
        // Flip the phase first so the worker ignores snapshots that are already queued.
        self.shared.phase.send_replace(SessionPhase::Disconnected);

        let Some(active) = self.active.lock().await.take() else {
            debug!("Disconnect requested while not in a room");
            return;
        };
        info!("Disconnecting {} from room {}", active.local_id, active.room);

        let (done_tx, done_rx) = oneshot::channel();
        if active
            .command_tx
            .send(SessionCommand::Disconnect { done: done_tx })
            .is_ok()
        {
            let _ = done_rx.await;
        }

        if let Err(e) = active.worker.await {
            error!("Signaling worker for room {} failed: {}", active.room, e);
        }
    }

    /// Runs `publish` against the active publisher while holding the session lock, so a
    /// concurrent disconnect cannot queue its delete ahead of the write.
    async fn with_connected_outbound<R>(
        &self,
        publish: impl FnOnce(&OutboundPublisher) -> R,
    ) -> Result<R, SignalingError> {
        let active = self.active.lock().await;
        if self.phase() != SessionPhase::Connected {
            return Err(SignalingError::NotConnected);
        }
        active
            .as_ref()
            .map(|a| publish(&a.outbound))
            .ok_or(SignalingError::NotConnected)
    }
}
