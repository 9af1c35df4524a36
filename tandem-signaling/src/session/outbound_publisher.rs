use crate::store::RoomStore;
use dashmap::DashSet;
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{Candidate, CandidateKey, Description, PeerId, RoomId, RoomLayout, StorePath};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

#[derive(Debug)]
enum StoreOp {
    Write { path: StorePath, value: Value },
    Delete { path: StorePath },
}

/// Writes the local peer's record. Operations are queued in call order and applied by a
/// background task without waiting for the store to acknowledge them.
#[derive(Clone)]
pub(crate) struct OutboundPublisher {
    room: RoomId,
    local_id: PeerId,
    layout: RoomLayout,
    published: Arc<DashSet<CandidateKey>>,
    tx: mpsc::UnboundedSender<StoreOp>,
}

impl OutboundPublisher {
    pub fn spawn(store: Arc<dyn RoomStore>, layout: RoomLayout, room: RoomId, local_id: PeerId) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(store, rx));

        Self {
            room,
            local_id,
            layout,
            published: Arc::new(DashSet::new()),
            tx,
        }
    }

    /// Marks the local peer as a room member.
    pub fn register(&self) {
        self.enqueue(StoreOp::Write {
            path: self.layout.connected(&self.room, &self.local_id),
            value: Value::Bool(true),
        });
    }

    pub fn publish_description(&self, description: &Description) {
        match serde_json::to_value(description) {
            Ok(value) => self.enqueue(StoreOp::Write {
                path: self.layout.description(&self.room, &self.local_id),
                value,
            }),
            Err(e) => error!("Failed to serialize {} description: {}", description.kind, e),
        }
    }

    pub fn publish_candidate(&self, candidate: &Candidate) {
        let key = candidate.key();
        match serde_json::to_value(candidate) {
            Ok(value) => {
                self.enqueue(StoreOp::Write {
                    path: self.layout.candidate(&self.room, &self.local_id, &key),
                    value,
                });
                self.published.insert(key);
            }
            Err(e) => error!("Failed to serialize candidate {}: {}", key, e),
        }
    }

    /// Removes candidates this peer published earlier; unknown ones are ignored.
    /// Returns how many removals were issued.
    pub fn retract_candidates(&self, candidates: &[Candidate]) -> usize {
        let mut removed = 0;
        for candidate in candidates {
            let key = candidate.key();
            if self.published.remove(&key).is_none() {
                debug!("Ignoring retraction of unpublished candidate {}", key);
                continue;
            }
            self.enqueue(StoreOp::Delete {
                path: self.layout.candidate(&self.room, &self.local_id, &key),
            });
            removed += 1;
        }
        removed
    }

    /// Deletes the whole local record. Queued behind earlier writes so nothing resurrects it.
    pub fn withdraw(&self) {
        self.published.clear();
        self.enqueue(StoreOp::Delete {
            path: self.layout.peer(&self.room, &self.local_id),
        });
    }

    fn enqueue(&self, op: StoreOp) {
        if let Err(e) = self.tx.send(op) {
            warn!("Publisher stopped, dropping {:?}", e.0);
        }
    }
}

async fn drain(store: Arc<dyn RoomStore>, mut rx: mpsc::UnboundedReceiver<StoreOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            StoreOp::Write { path, value } => {
                if let Err(e) = store.write(&path, value).await {
                    warn!("Write to {} failed: {}", path, e);
                }
            }
            StoreOp::Delete { path } => {
                if let Err(e) = store.delete(&path).await {
                    warn!("Delete of {} failed: {}", path, e);
                }
            }
        }
    }
    debug!("Publisher queue drained");
}
