mod outbound_publisher;
mod session_command;
mod session_event;
mod session_state;
mod session_worker;
mod signaling_session;

pub use session_event::*;
pub use session_state::*;
pub use signaling_session::*;
