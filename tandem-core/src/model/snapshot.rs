use crate::model::{Candidate, Description, PeerId};
use std::collections::BTreeMap;

/// One member's entry under the room path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerRecord {
    pub connected: bool,
    pub description: Option<Description>,
    pub candidates: Vec<Candidate>,
}

/// Full contents of a room subtree as delivered by the store. Carries no hint of what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSnapshot {
    exists: bool,
    members: BTreeMap<PeerId, PeerRecord>,
}

impl RoomSnapshot {
    /// Snapshot of a room path that holds no data at all.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn new(members: BTreeMap<PeerId, PeerRecord>) -> Self {
        Self {
            exists: true,
            members,
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn contains(&self, peer: &PeerId) -> bool {
        self.members.contains_key(peer)
    }

    pub fn get(&self, peer: &PeerId) -> Option<&PeerRecord> {
        self.members.get(peer)
    }

    pub fn members(&self) -> impl Iterator<Item = (&PeerId, &PeerRecord)> {
        self.members.iter()
    }

    /// Every member except `local`.
    pub fn others<'a>(&'a self, local: &'a PeerId) -> impl Iterator<Item = (&'a PeerId, &'a PeerRecord)> {
        self.members.iter().filter(move |(id, _)| *id != local)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
