//! # Linking Service Client
//!
//! Exchanges a serialized verification request for an opaque deep-link
//! token via `POST {base}/post-deferred-linking-token`.

use std::time::Duration;

use disclose_core::LinkToken;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{DeferredLinkRequest, TokenResponse};

const TOKEN_PATH: &str = "/post-deferred-linking-token";

/// reqwest client for the external linking service.
#[derive(Debug, Clone)]
pub struct LinkingServiceClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl LinkingServiceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Request a token. `Ok(None)` when the service answers with an empty one.
    pub async fn fetch_token(
        &self,
        request: &DeferredLinkRequest,
    ) -> Result<Option<LinkToken>, ClientError> {
        let endpoint = self.config.endpoint(TOKEN_PATH);
        let resp = self
            .client
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|source| ClientError::Deserialization { endpoint, source })?;
        Ok(LinkToken::new(body.data))
    }
}
