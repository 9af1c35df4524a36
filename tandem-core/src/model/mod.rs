mod candidate;
mod description;
mod layout;
mod peer;
mod relay;
mod room;
#[cfg(not(target_arch = "wasm32"))]
mod rtc;
mod snapshot;

pub use candidate::{Candidate, CandidateKey};
pub use description::{Description, SdpKind};
pub use layout::{RoomLayout, StorePath};
pub use peer::PeerId;
pub use relay::RelayServer;
pub use room::RoomId;
pub use snapshot::{PeerRecord, RoomSnapshot};
