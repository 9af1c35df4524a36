use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Store key of a published candidate. Derived from the candidate's content so a later
/// retraction can address the same entry without remembering an allocated id.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateKey(pub String);

impl CandidateKey {
    const LEN: usize = 32;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Kept as written by other clients, which store a signed 32-bit index.
    #[serde(rename = "sdpMLineIndex")]
    pub media_line_index: i32,
    #[serde(rename = "sdpMid")]
    pub media_id: String,
    #[serde(rename = "sdp")]
    pub content: String,
}

impl Candidate {
    pub fn new(media_line_index: i32, media_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            media_line_index,
            media_id: media_id.into(),
            content: content.into(),
        }
    }

    pub fn key(&self) -> CandidateKey {
        let mut hasher = Sha256::new();
        hasher.update(self.media_id.as_bytes());
        hasher.update([0]);
        hasher.update(self.media_line_index.to_string().as_bytes());
        hasher.update([0]);
        hasher.update(self.content.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(CandidateKey::LEN);
        CandidateKey(digest)
    }
}
