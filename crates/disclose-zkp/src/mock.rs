//! # Mock Proof Verifier
//!
//! Returns a canned `ProofResult` for every submission and records how many
//! times it was called. Used by the API tests and by local runs without a
//! verification service.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use disclose_core::{SubjectId, ValidityDetails};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::traits::{ProofVerifier, VerifierError};
use crate::types::{ProofResult, ProofSubmission, UserData};

/// Canned-result verifier.
#[derive(Debug)]
pub struct MockProofVerifier {
    outcome: Mutex<Result<ProofResult, String>>,
    calls: AtomicUsize,
}

impl MockProofVerifier {
    /// Always answer with `result`.
    pub fn new(result: ProofResult) -> Self {
        Self {
            outcome: Mutex::new(Ok(result)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A passing proof for `subject` revealing `disclosed`.
    pub fn passing(subject: &SubjectId, disclosed: Map<String, Value>) -> Self {
        Self::with_details(subject, ValidityDetails::passing(), disclosed)
    }

    pub fn with_details(
        subject: &SubjectId,
        details: ValidityDetails,
        disclosed: Map<String, Value>,
    ) -> Self {
        Self::new(ProofResult {
            is_valid_details: details,
            disclose_output: disclosed,
            user_data: UserData {
                user_identifier: subject.to_string(),
                user_defined_data: String::new(),
            },
        })
    }

    /// Always fail with `VerifierError::Rejected(reason)`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(Err(reason.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the canned result.
    pub fn set_result(&self, result: ProofResult) {
        *self.outcome.lock() = Ok(result);
    }

    /// Number of `verify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProofVerifier for MockProofVerifier {
    async fn verify(&self, _submission: &ProofSubmission) -> Result<ProofResult, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.lock().clone().map_err(VerifierError::Rejected)
    }
}
