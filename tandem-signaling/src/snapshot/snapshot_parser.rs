use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tandem_core::{Candidate, Description, PeerId, PeerRecord, RoomLayout, RoomSnapshot};
use tracing::warn;

/// Interprets the raw subtree delivered by the store. A corrupt entry is logged and
/// skipped on its own; everything else in the snapshot is still used.
pub fn parse_room_snapshot(value: Option<&Value>) -> RoomSnapshot {
    let members = match value {
        None | Some(Value::Null) => return RoomSnapshot::absent(),
        Some(Value::Object(members)) => members,
        Some(other) => {
            warn!("Room subtree is not an object, ignoring contents: {}", other);
            return RoomSnapshot::new(BTreeMap::new());
        }
    };

    let records = members
        .iter()
        .filter_map(|(key, entry)| {
            let peer_id = PeerId::from(key.as_str());
            parse_peer_record(&peer_id, entry).map(|record| (peer_id, record))
        })
        .collect();

    RoomSnapshot::new(records)
}

fn parse_peer_record(peer_id: &PeerId, value: &Value) -> Option<PeerRecord> {
    let Value::Object(fields) = value else {
        warn!("Skipping malformed record for peer {}: {}", peer_id, value);
        return None;
    };

    let connected = fields
        .get(RoomLayout::CONNECTED)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let description = fields
        .get(RoomLayout::DESCRIPTION)
        .and_then(|raw| match serde_json::from_value::<Description>(raw.clone()) {
            Ok(description) => Some(description),
            Err(e) => {
                warn!("Skipping malformed description from {}: {}", peer_id, e);
                None
            }
        });

    let candidates = match fields.get(RoomLayout::CANDIDATES) {
        None => Vec::new(),
        Some(Value::Object(entries)) => parse_candidates(peer_id, entries),
        Some(other) => {
            warn!("Skipping malformed candidate list from {}: {}", peer_id, other);
            Vec::new()
        }
    };

    Some(PeerRecord {
        connected,
        description,
        candidates,
    })
}

fn parse_candidates(peer_id: &PeerId, entries: &Map<String, Value>) -> Vec<Candidate> {
    entries
        .iter()
        .filter_map(
            |(key, raw)| match serde_json::from_value::<Candidate>(raw.clone()) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!("Skipping malformed candidate {} from {}: {}", key, peer_id, e);
                    None
                }
            },
        )
        .collect()
}
