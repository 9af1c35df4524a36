use crate::snapshot::DedupLedger;
use tandem_core::{Candidate, Description, PeerId, RoomSnapshot};

/// Something newly learned about a remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    RemoteDescription(PeerId, Description),
    RemoteCandidate(PeerId, Candidate),
}

/// Turns repeated full snapshots into facts.
///
/// Descriptions pass through the ledger, so a description repeated across snapshots is reported
/// once. Candidates are reported every time they are seen; the negotiation engine treats
/// re-adding a known candidate as harmless.
pub struct SnapshotDiffer;

impl SnapshotDiffer {
    pub fn diff(snapshot: &RoomSnapshot, local: &PeerId, ledger: &mut DedupLedger) -> Vec<Fact> {
        let mut facts = Vec::new();

        for (peer_id, record) in snapshot.others(local) {
            if let Some(description) = &record.description {
                if ledger.admit(description) {
                    facts.push(Fact::RemoteDescription(peer_id.clone(), description.clone()));
                }
            }

            facts.extend(
                record
                    .candidates
                    .iter()
                    .map(|c| Fact::RemoteCandidate(peer_id.clone(), c.clone())),
            );
        }

        facts
    }
}
