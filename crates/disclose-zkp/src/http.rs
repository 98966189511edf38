//! # HTTP Proof Verifier
//!
//! Forwards a complete submission to a remote verification service together
//! with the relying party's scope and endpoint, and parses the service's
//! `ProofResult`.
//!
//! Uses a per-request timeout (default 30s). No retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::traits::{ProofVerifier, VerifierError};
use crate::types::{ProofResult, ProofSubmission};

/// Configuration for [`HttpProofVerifier`].
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Full URL the submission is POSTed to.
    pub url: String,
    /// Scope the proof must be bound to.
    pub scope: String,
    /// Endpoint the proof must be bound to.
    pub endpoint: String,
    /// Accept proofs from mock passports (staging).
    pub mock_passport: bool,
    pub user_id_type: String,
    pub timeout_secs: u64,
}

impl VerifierConfig {
    pub fn new(url: impl Into<String>, scope: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scope: scope.into(),
            endpoint: endpoint.into(),
            mock_passport: true,
            user_id_type: "uuid".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyCall<'a> {
    #[serde(flatten)]
    submission: &'a ProofSubmission,
    scope: &'a str,
    endpoint: &'a str,
    mock_passport: bool,
    user_identifier_type: &'a str,
}

/// reqwest-backed verifier.
#[derive(Debug)]
pub struct HttpProofVerifier {
    client: reqwest::Client,
    config: VerifierConfig,
}

impl HttpProofVerifier {
    pub fn new(config: VerifierConfig) -> Result<Self, VerifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerifierError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ProofVerifier for HttpProofVerifier {
    async fn verify(&self, submission: &ProofSubmission) -> Result<ProofResult, VerifierError> {
        let endpoint = self.config.url.clone();
        let call = VerifyCall {
            submission,
            scope: &self.config.scope,
            endpoint: &self.config.endpoint,
            mock_passport: self.config.mock_passport,
            user_identifier_type: &self.config.user_id_type,
        };

        tracing::debug!(endpoint = %endpoint, "calling proof verifier");
        let resp = self
            .client
            .post(&endpoint)
            .json(&call)
            .send()
            .await
            .map_err(|source| VerifierError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VerifierError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<ProofResult>()
            .await
            .map_err(|source| VerifierError::Deserialization { endpoint, source })
    }
}
