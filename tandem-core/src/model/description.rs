use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdpKind::Offer => "offer",
            SdpKind::Answer => "answer",
        }
    }

    /// Accepts the canonical lowercase form as well as upper-case enum names
    /// written by other clients.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("offer") {
            Some(SdpKind::Offer)
        } else if s.eq_ignore_ascii_case("answer") {
            Some(SdpKind::Answer)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for SdpKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SdpKind::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("unknown description type '{}'", raw)))
    }
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session description as stored under `<peer>/sdp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    #[serde(rename = "description")]
    pub content: String,
}

impl Description {
    pub fn new(kind: SdpKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn offer(content: impl Into<String>) -> Self {
        Self::new(SdpKind::Offer, content)
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self::new(SdpKind::Answer, content)
    }

    /// Identity used to suppress redelivery: kind followed by the raw content.
    pub fn dedup_key(&self) -> String {
        format!("{}{}", self.kind, self.content)
    }
}
