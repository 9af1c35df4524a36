use serde::{Deserialize, Serialize};

/// A single STUN/TURN endpoint with the credentials needed to use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayServer {
    pub url: String,
    pub username: String,
    pub credential: String,
}

impl RelayServer {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            credential: credential.into(),
        }
    }
}
