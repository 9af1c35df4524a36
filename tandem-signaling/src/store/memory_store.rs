use crate::error::StoreError;
use crate::store::{RoomStore, SnapshotStream, StoreEvent, Subscription, SubscriptionId};
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tandem_core::StorePath;
use tokio::sync::mpsc;
use tracing::debug;

struct Subscriber {
    path: StorePath,
    tx: mpsc::UnboundedSender<StoreEvent>,
}

#[derive(Default)]
struct MemoryInner {
    root: Map<String, Value>,
    subscribers: HashMap<SubscriptionId, Subscriber>,
    next_id: u64,
}

impl MemoryInner {
    fn value_at(&self, path: &StorePath) -> Option<Value> {
        let mut segments = path.segments().iter();
        let Some(first) = segments.next() else {
            return Some(Value::Object(self.root.clone())).filter(|_| !self.root.is_empty());
        };
        let mut node = self.root.get(first)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        Some(node.clone())
    }

    fn notify(&mut self, changed: &StorePath) {
        let mut closed = Vec::new();
        for (id, sub) in &self.subscribers {
            if !sub.path.overlaps(changed) {
                continue;
            }
            if sub.tx.send(Ok(self.value_at(&sub.path))).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            self.subscribers.remove(&id);
        }
    }
}

fn set_at(node: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut node = node;
    for segment in parents {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(child) = entry else {
            return;
        };
        node = child;
    }
    node.insert(last.clone(), value);
}

/// Removes the entry and prunes parents left empty, so an emptied room reads as absent.
fn remove_at(node: &mut Map<String, Value>, segments: &[String]) {
    let Some((first, rest)) = segments.split_first() else {
        node.clear();
        return;
    };
    if rest.is_empty() {
        node.remove(first);
        return;
    }
    let Some(Value::Object(child)) = node.get_mut(first) else {
        return;
    };
    remove_at(child, rest);
    if child.is_empty() {
        node.remove(first);
    }
}

/// In-process [`RoomStore`] with full-snapshot redelivery: every subscriber whose subtree
/// overlaps a change receives its whole subtree again. Cloning shares the same document.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents at `path`, `None` when nothing is stored there.
    pub fn value_at(&self, path: &StorePath) -> Option<Value> {
        self.inner.lock().value_at(path)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Pushes a delivery failure to every subscriber of `path`.
    pub fn inject_delivery_error(&self, path: &StorePath, error: StoreError) {
        let inner = self.inner.lock();
        for sub in inner.subscribers.values().filter(|s| &s.path == path) {
            let _ = sub.tx.send(Err(error.clone()));
        }
    }

    /// Ends every subscription stream on `path`, as a store dropping its listeners would.
    pub fn close_subscriptions(&self, path: &StorePath) {
        self.inner.lock().subscribers.retain(|_, s| &s.path != path);
    }

    fn apply(&self, path: &StorePath, value: Option<Value>) {
        let mut inner = self.inner.lock();
        match value {
            Some(Value::Null) | None => remove_at(&mut inner.root, path.segments()),
            Some(v) if path.is_root() => {
                inner.root = match v {
                    Value::Object(map) => map,
                    _ => Map::new(),
                }
            }
            Some(v) => set_at(&mut inner.root, path.segments(), v),
        }
        inner.notify(path);
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();

        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        // Listeners always start with the current contents.
        let _ = tx.send(Ok(inner.value_at(path)));
        inner.subscribers.insert(
            id,
            Subscriber {
                path: path.clone(),
                tx,
            },
        );
        debug!("Memory store subscription {:?} on {}", id, path);

        let stream: SnapshotStream =
            futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|e| (e, rx)) })
                .boxed();
        Ok(Subscription { id, stream })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.inner.lock().subscribers.remove(&id);
        Ok(())
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        self.apply(path, Some(value));
        Ok(())
    }

    async fn delete(&self, path: &StorePath) -> Result<(), StoreError> {
        self.apply(path, None);
        Ok(())
    }
}
