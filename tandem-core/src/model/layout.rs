use crate::model::{CandidateKey, PeerId, RoomId};
use std::fmt;

/// Slash-separated location inside the hierarchical store.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Default)]
pub struct StorePath(Vec<String>);

impl StorePath {
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` equals `other` or lies above it.
    pub fn is_ancestor_of(&self, other: &StorePath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// True when a change at one path can alter the contents observed at the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

/// Where room data lives: `<root>/<room>/<peer>/{connected,sdp,icecandidate/<key>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLayout {
    root: StorePath,
}

impl RoomLayout {
    pub const CONNECTED: &'static str = "connected";
    pub const DESCRIPTION: &'static str = "sdp";
    pub const CANDIDATES: &'static str = "icecandidate";

    pub fn new(root: &str) -> Self {
        Self {
            root: StorePath::parse(root),
        }
    }

    pub fn room(&self, room: &RoomId) -> StorePath {
        self.root.child(room.as_str())
    }

    pub fn peer(&self, room: &RoomId, peer: &PeerId) -> StorePath {
        self.room(room).child(peer.as_str())
    }

    pub fn connected(&self, room: &RoomId, peer: &PeerId) -> StorePath {
        self.peer(room, peer).child(Self::CONNECTED)
    }

    pub fn description(&self, room: &RoomId, peer: &PeerId) -> StorePath {
        self.peer(room, peer).child(Self::DESCRIPTION)
    }

    pub fn candidates(&self, room: &RoomId, peer: &PeerId) -> StorePath {
        self.peer(room, peer).child(Self::CANDIDATES)
    }

    pub fn candidate(&self, room: &RoomId, peer: &PeerId, key: &CandidateKey) -> StorePath {
        self.candidates(room, peer).child(key.as_str())
    }
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self::new("channels")
    }
}
