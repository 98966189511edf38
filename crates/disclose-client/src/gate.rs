//! # Gate Client
//!
//! Typed client for a running disclosure gate. Used by the CLI and by
//! sessions that persist through the HTTP surface rather than in-process.

use std::time::Duration;

use disclose_core::{LinkToken, SubjectId, VerificationConfig};
use disclose_zkp::PartialSubmission;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{
    DeferredLinkRequest, RequestPreview, SaveOptionsRequest, TokenResponse, VerifyFailure,
    VerifyResponse, VerifySuccess,
};

/// reqwest client for the gate's endpoints.
#[derive(Debug, Clone)]
pub struct GateClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl GateClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// `POST /saveOptions`.
    pub async fn save_options(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), ClientError> {
        let body = SaveOptionsRequest {
            subject_id: subject.clone(),
            options: config.normalized(),
        };
        let resp = self.post("/saveOptions", &body).await?;
        Self::check(resp, self.config.endpoint("/saveOptions")).await?;
        Ok(())
    }

    /// `POST /deferredLinking`. `Ok(None)` for an empty token.
    pub async fn deferred_linking(
        &self,
        request: &DeferredLinkRequest,
    ) -> Result<Option<LinkToken>, ClientError> {
        let body: TokenResponse = self.post_json("/deferredLinking", request).await?;
        Ok(LinkToken::new(body.data))
    }

    /// `POST /verify`. A negative verification is `Ok(VerifyResponse::Failure)`.
    pub async fn verify(&self, submission: &PartialSubmission) -> Result<VerifyResponse, ClientError> {
        let endpoint = self.config.endpoint("/verify");
        let resp = self.post("/verify", submission).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|source| ClientError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        if status.is_success() {
            if let Ok(success) = serde_json::from_str::<VerifySuccess>(&text) {
                return Ok(VerifyResponse::Success(success));
            }
        } else if let Ok(failure) = serde_json::from_str::<VerifyFailure>(&text) {
            return Ok(VerifyResponse::Failure(failure));
        }
        Err(ClientError::Api {
            endpoint,
            status: status.as_u16(),
            body: text,
        })
    }

    /// `POST /v1/request`.
    pub async fn request_preview(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<RequestPreview, ClientError> {
        let body = SaveOptionsRequest {
            subject_id: subject.clone(),
            options: config.clone(),
        };
        self.post_json("/v1/request", &body).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let endpoint = self.config.endpoint(path);
        tracing::debug!(endpoint = %endpoint, "POST");
        self.client
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Http { endpoint, source })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let endpoint = self.config.endpoint(path);
        let resp = self.post(path, body).await?;
        let resp = Self::check(resp, endpoint.clone()).await?;
        resp.json()
            .await
            .map_err(|source| ClientError::Deserialization { endpoint, source })
    }

    async fn check(
        resp: reqwest::Response,
        endpoint: String,
    ) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Api {
            endpoint,
            status: status.as_u16(),
            body,
        })
    }
}
