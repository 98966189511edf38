//! Submission and result types exchanged with the verifier.

use disclose_core::{SubjectId, ValidationError, ValidityDetails};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used when any submission field is missing.
const REQUIRED_FIELDS: &str = "Proof, publicSignals, attestationId and userContextData";

/// A submission as received, before the completeness check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSubmission {
    #[serde(default)]
    pub attestation_id: Option<Value>,
    #[serde(default)]
    pub proof: Option<Value>,
    #[serde(default)]
    pub public_signals: Option<Value>,
    #[serde(default)]
    pub user_context_data: Option<String>,
}

impl PartialSubmission {
    /// Reject the submission unless every field is present and non-empty.
    pub fn complete(self) -> Result<ProofSubmission, ValidationError> {
        match (
            self.attestation_id.filter(is_present),
            self.proof.filter(is_present),
            self.public_signals.filter(is_present),
            self.user_context_data.filter(|s| !s.is_empty()),
        ) {
            (Some(attestation_id), Some(proof), Some(public_signals), Some(user_context_data)) => {
                Ok(ProofSubmission {
                    attestation_id,
                    proof,
                    public_signals,
                    user_context_data,
                })
            }
            _ => Err(ValidationError::MissingFields(REQUIRED_FIELDS.into())),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// A complete proof submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofSubmission {
    pub attestation_id: Value,
    pub proof: Value,
    pub public_signals: Value,
    pub user_context_data: String,
}

/// Subject data echoed back by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_identifier: String,
    #[serde(default)]
    pub user_defined_data: String,
}

/// What the verifier says about a proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResult {
    pub is_valid_details: ValidityDetails,
    #[serde(default)]
    pub disclose_output: Map<String, Value>,
    pub user_data: UserData,
}

impl ProofResult {
    /// The subject whose stored config governs redaction.
    pub fn subject(&self) -> Result<SubjectId, ValidationError> {
        SubjectId::new(self.user_data.user_identifier.clone())
    }
}
