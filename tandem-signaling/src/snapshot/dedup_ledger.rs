use std::collections::HashSet;
use tandem_core::Description;

/// Descriptions already handed to the negotiation engine during this session,
/// keyed by kind and content. Only grows until the session disconnects.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the description and reports whether it had not been seen before.
    pub fn admit(&mut self, description: &Description) -> bool {
        self.seen.insert(description.dedup_key())
    }

    pub fn contains(&self, description: &Description) -> bool {
        self.seen.contains(&description.dedup_key())
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
