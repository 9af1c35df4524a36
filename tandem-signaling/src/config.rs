use serde::{Deserialize, Serialize};
use std::time::Duration;
use tandem_core::RoomLayout;

pub const ENV_ROOT_PATH: &str = "TANDEM_ROOT_PATH";
pub const ENV_RELAY_URL: &str = "TANDEM_RELAY_URL";

/// Session configuration. Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    /// Store path under which rooms are created.
    pub root_path: String,

    /// Endpoint returning `{"iceServers": [...]}`. No relays are requested when unset.
    pub relay_credentials_url: Option<String>,

    /// Connect and read timeout for the relay request, in milliseconds.
    pub relay_fetch_timeout_ms: u64,

    /// Sent as the `Referer` header of the relay request.
    pub referer: String,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            root_path: "channels".to_owned(),
            relay_credentials_url: None,
            relay_fetch_timeout_ms: 5000,
            referer: "https://appr.tc".to_owned(),
        }
    }
}

impl SignalingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Defaults overridden by `TANDEM_ROOT_PATH` and `TANDEM_RELAY_URL` when present.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(ENV_ROOT_PATH) {
            config.root_path = root;
        }
        if let Ok(url) = std::env::var(ENV_RELAY_URL) {
            config.relay_credentials_url = Some(url).filter(|u| !u.is_empty());
        }
        config
    }

    pub fn layout(&self) -> RoomLayout {
        RoomLayout::new(&self.root_path)
    }

    pub fn relay_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_fetch_timeout_ms)
    }
}
