use thiserror::Error;

/// Failures returned to the host application by session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalingError {
    /// Loopback / self-test rooms need a second in-process peer, which this core does not provide.
    #[error("loopback rooms are not supported")]
    UnsupportedTopology,

    #[error("session is not connected to a room")]
    NotConnected,

    #[error("session is already connected or connecting")]
    AlreadyActive,
}

/// Errors reported by a [`crate::RoomStore`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("operation on {path} rejected: {reason}")]
    Rejected { path: String, reason: String },

    #[error("subscription closed by the store")]
    SubscriptionClosed,

    #[error("snapshot delivery failed: {0}")]
    Delivery(String),
}

/// Relay credential retrieval failures. Sessions absorb these and continue with no relays.
#[derive(Debug, Error)]
pub enum CredentialFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed relay configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
