//! # Proof Verifier Trait
//!
//! The opaque verifier seam. Implementations must be `Send + Sync`; the API
//! shares one instance across requests behind an `Arc`.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ProofResult, ProofSubmission};

/// A verifier call that did not produce a result.
///
/// Semantic failures (age, OFAC, overall validity) are *not* errors: they
/// come back as a `ProofResult` with the relevant flag cleared.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The verifier returned a non-2xx status.
    #[error("verifier {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The verifier's reply did not parse.
    #[error("failed to deserialize verifier response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The verifier could not process the proof at all.
    #[error("proof rejected: {0}")]
    Rejected(String),
    /// Client construction failed.
    #[error("verifier configuration error: {0}")]
    Config(String),
}

/// Verifies a proof submission.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    async fn verify(&self, submission: &ProofSubmission) -> Result<ProofResult, VerifierError>;
}
