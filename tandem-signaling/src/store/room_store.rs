use crate::error::StoreError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use tandem_core::StorePath;

/// One delivery from a subscription: the whole subtree (`None` when the path holds nothing)
/// or a transport failure.
pub type StoreEvent = Result<Option<Value>, StoreError>;

pub type SnapshotStream = BoxStream<'static, StoreEvent>;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct SubscriptionId(pub u64);

/// A live subscription. The stream only ends if the store gives up on it; resubscribing is
/// the only way to restart.
pub struct Subscription {
    pub id: SubscriptionId,
    pub stream: SnapshotStream,
}

/// Hierarchical document store shared by the peers of a room.
///
/// Subscriptions deliver the entire subtree again on every change by anyone, including
/// changes made by the subscriber itself.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, StoreError>;

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError>;

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    async fn delete(&self, path: &StorePath) -> Result<(), StoreError>;
}
