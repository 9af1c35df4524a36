use crate::error::StoreError;
use crate::relay::RelayCredentialFetcher;
use crate::session::outbound_publisher::OutboundPublisher;
use crate::session::session_command::SessionCommand;
use crate::session::{SessionEvent, SessionPhase, SessionShared, SessionState};
use crate::snapshot::{
    DedupLedger, Fact, Role, RoleResolver, SnapshotDiffer, parse_room_snapshot,
};
use crate::store::{RoomStore, SnapshotStream, StoreEvent, SubscriptionId};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{RelayServer, RoomId, RoomSnapshot, StorePath};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Serial owner of one room membership. Snapshots and commands are handled one at a time,
/// in arrival order, so the ledger and state need no locking.
pub(crate) struct SessionWorker {
    room: RoomId,
    room_path: StorePath,
    state: SessionState,
    ledger: DedupLedger,
    store: Arc<dyn RoomStore>,
    fetcher: Arc<dyn RelayCredentialFetcher>,
    relay_url: Option<String>,
    outbound: OutboundPublisher,
    shared: Arc<SessionShared>,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

pub(crate) struct WorkerParts {
    pub room: RoomId,
    pub room_path: StorePath,
    pub state: SessionState,
    pub store: Arc<dyn RoomStore>,
    pub fetcher: Arc<dyn RelayCredentialFetcher>,
    pub relay_url: Option<String>,
    pub outbound: OutboundPublisher,
    pub shared: Arc<SessionShared>,
    pub command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    pub events: mpsc::UnboundedSender<SessionEvent>,
}

/// A command that arrived while the worker was busy joining the room.
struct Interrupted(Option<SessionCommand>);

async fn fetch_relay_servers(
    fetcher: Arc<dyn RelayCredentialFetcher>,
    url: Option<String>,
) -> Vec<RelayServer> {
    let Some(url) = url else {
        return Vec::new();
    };

    match fetcher.fetch(&url).await {
        Ok(servers) => {
            info!("Received {} relay servers", servers.len());
            servers
        }
        Err(e) => {
            warn!("Relay credential fetch failed, continuing without relays: {}", e);
            Vec::new()
        }
    }
}

async fn next_delivery(snapshots: &mut Option<SnapshotStream>) -> Option<StoreEvent> {
    match snapshots {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

impl SessionWorker {
    pub fn new(parts: WorkerParts) -> Self {
        Self {
            room: parts.room,
            room_path: parts.room_path,
            state: parts.state,
            ledger: DedupLedger::new(),
            store: parts.store,
            fetcher: parts.fetcher,
            relay_url: parts.relay_url,
            outbound: parts.outbound,
            shared: parts.shared,
            command_rx: parts.command_rx,
            events: parts.events,
        }
    }

    pub async fn run(mut self) {
        info!(
            "Signaling worker started for {} in room {}",
            self.state.local_id, self.room
        );

        // A disconnect must not wait for a store that never answers the subscription.
        let subscribed = tokio::select! {
            result = self.store.subscribe(&self.room_path) => result,
            cmd = self.command_rx.recv() => {
                self.finish(cmd, None).await;
                return;
            }
        };

        let (mut subscription, mut snapshots) = match subscribed {
            Ok(sub) => {
                self.state.subscribed = true;
                (Some(sub.id), Some(sub.stream))
            }
            Err(e) => {
                error!("Failed to subscribe to {}: {}", self.room_path, e);
                self.notify(SessionEvent::StoreDeliveryFailed(e));
                (None, None)
            }
        };

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    self.finish(cmd, subscription.take()).await;
                    break;
                }

                delivery = next_delivery(&mut snapshots) => {
                    match delivery {
                        Some(Ok(value)) => {
                            if let Err(Interrupted(cmd)) = self.handle_snapshot(value.as_ref()).await {
                                self.finish(cmd, subscription.take()).await;
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            error!("Snapshot delivery failed for {}: {}", self.room_path, e);
                            self.notify(SessionEvent::StoreDeliveryFailed(e));
                        }
                        None => {
                            warn!("Store closed the subscription on {}", self.room_path);
                            snapshots = None;
                            self.notify(SessionEvent::StoreDeliveryFailed(StoreError::SubscriptionClosed));
                        }
                    }
                }
            }
        }

        info!("Signaling worker finished for room {}", self.room);
    }

    /// Leaves the room in response to `cmd`; `None` means the session handle was dropped.
    async fn finish(&mut self, cmd: Option<SessionCommand>, subscription: Option<SubscriptionId>) {
        self.shutdown(subscription).await;
        match cmd {
            Some(SessionCommand::Disconnect { done }) => {
                let _ = done.send(());
            }
            None => info!("Session handle dropped. Left room {}", self.room),
        }
    }

    fn is_disconnecting(&self) -> bool {
        self.shared.phase() == SessionPhase::Disconnected
    }

    async fn handle_snapshot(&mut self, value: Option<&Value>) -> Result<(), Interrupted> {
        // The snapshot may have been queued before a disconnect was requested.
        if self.is_disconnecting() {
            debug!("Dropping snapshot for {} after disconnect", self.room);
            return Ok(());
        }

        let snapshot = parse_room_snapshot(value);

        if self.state.role == Role::Undetermined {
            self.enter_room(&snapshot).await?;
        } else if !snapshot.contains(&self.state.local_id) {
            info!(
                "Record of {} missing from room {}, registering again",
                self.state.local_id, self.room
            );
            self.outbound.register();
        }

        for fact in SnapshotDiffer::diff(&snapshot, &self.state.local_id, &mut self.ledger) {
            self.deliver(fact);
        }
        Ok(())
    }

    async fn enter_room(&mut self, snapshot: &RoomSnapshot) -> Result<(), Interrupted> {
        let role = RoleResolver::resolve(snapshot, &self.state.local_id);
        self.state.role = role;
        self.shared.role.send_replace(role);

        if !snapshot.contains(&self.state.local_id) {
            self.outbound.register();
        }
        self.shared
            .advance(SessionPhase::Connecting, SessionPhase::Connected);
        info!(
            "Peer {} joined room {} as {}",
            self.state.local_id, self.room, role
        );

        // The relay request may be slow; a disconnect arriving meanwhile wins and
        // RoomConnected is never sent.
        let fetch = fetch_relay_servers(self.fetcher.clone(), self.relay_url.clone());
        let relay_servers = tokio::select! {
            servers = fetch => servers,
            cmd = self.command_rx.recv() => return Err(Interrupted(cmd)),
        };

        self.notify(SessionEvent::RoomConnected {
            role,
            relay_servers,
        });
        Ok(())
    }

    fn deliver(&self, fact: Fact) {
        let event = match fact {
            Fact::RemoteDescription(from, description) => {
                debug!("Remote {} description from {}", description.kind, from);
                SessionEvent::RemoteDescriptionReceived { from, description }
            }
            Fact::RemoteCandidate(from, candidate) => {
                debug!("Remote candidate from {}", from);
                SessionEvent::RemoteCandidateReceived { from, candidate }
            }
        };
        self.notify(event);
    }

    fn notify(&self, event: SessionEvent) {
        if self.is_disconnecting() {
            debug!("Suppressing {:?} after disconnect", event);
            return;
        }
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped for room {}", self.room);
        }
    }

    async fn shutdown(&mut self, subscription: Option<SubscriptionId>) {
        self.shared.phase.send_replace(SessionPhase::Disconnected);
        self.outbound.withdraw();

        if let Some(id) = subscription {
            if let Err(e) = self.store.unsubscribe(id).await {
                warn!("Failed to unsubscribe from {}: {}", self.room_path, e);
            }
        }

        self.state.subscribed = false;
        self.ledger.clear();
        info!("Peer {} left room {}", self.state.local_id, self.room);
    }
}
