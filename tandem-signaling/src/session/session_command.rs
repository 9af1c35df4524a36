use tokio::sync::oneshot;

/// Requests sent from the session handle to its worker.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    /// Leave the room; `done` fires once the worker has stopped touching session state.
    Disconnect { done: oneshot::Sender<()> },
}
