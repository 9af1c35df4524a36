use crate::config::SignalingConfig;
use crate::error::CredentialFetchError;
use crate::relay::{RelayCredentialFetcher, parse_ice_servers};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::REFERER;
use tandem_core::RelayServer;
use tracing::{debug, info};

/// Requests relay servers from an HTTP ice-config endpoint.
pub struct HttpRelayFetcher {
    client: reqwest::Client,
    referer: String,
}

impl HttpRelayFetcher {
    pub fn new(config: &SignalingConfig) -> Result<Self, CredentialFetchError> {
        let timeout = config.relay_fetch_timeout();
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            referer: config.referer.clone(),
        })
    }
}

#[async_trait]
impl RelayCredentialFetcher for HttpRelayFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RelayServer>, CredentialFetchError> {
        info!("Requesting relay servers from {}", url);

        let response = self
            .client
            .post(url)
            .header(REFERER, &self.referer)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CredentialFetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Relay response: {}", body);
        parse_ice_servers(&body)
    }
}
