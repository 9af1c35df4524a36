use crate::error::CredentialFetchError;
use async_trait::async_trait;
use serde::Deserialize;
use tandem_core::RelayServer;

/// Source of STUN/TURN servers handed to the negotiation engine when a room is joined.
#[async_trait]
pub trait RelayCredentialFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<RelayServer>, CredentialFetchError>;
}

#[derive(Deserialize)]
struct IceConfigResponse {
    #[serde(rename = "iceServers")]
    ice_servers: Vec<IceServerEntry>,
}

#[derive(Deserialize)]
struct IceServerEntry {
    urls: Vec<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    credential: String,
}

/// Parses an `{"iceServers": [...]}` document. Each URL of an entry becomes its own
/// [`RelayServer`] sharing that entry's credentials.
pub fn parse_ice_servers(body: &str) -> Result<Vec<RelayServer>, CredentialFetchError> {
    let response: IceConfigResponse = serde_json::from_str(body)?;
    Ok(response
        .ice_servers
        .into_iter()
        .flat_map(|entry| {
            let IceServerEntry {
                urls,
                username,
                credential,
            } = entry;
            urls.into_iter()
                .map(move |url| RelayServer::new(url, username.clone(), credential.clone()))
        })
        .collect())
}
