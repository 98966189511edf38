//! # Proof Verification
//!
//! - `POST /verify` — check a submitted proof and release only the
//!   attributes the subject opted into.
//!
//! Order of work: completeness check (400, the verifier is never called),
//! verifier call, validity gate in the order age, OFAC, general (400 with
//! `failedCheck`, the store is never read), then redaction against the
//! subject's stored config. A subject with no stored config gets every
//! attribute redacted.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use disclose_core::{redact, FailedCheck, ValidityDetails, VerificationOptions};
use disclose_zkp::PartialSubmission;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::VerificationOutcome;
use crate::state::AppState;

/// Body of `/verify`. All four fields are required.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    #[schema(value_type = Object)]
    pub attestation_id: Option<Value>,
    #[schema(value_type = Object)]
    pub proof: Option<Value>,
    #[schema(value_type = Object)]
    pub public_signals: Option<Value>,
    pub user_context_data: Option<String>,
}

impl From<VerifyBody> for PartialSubmission {
    fn from(body: VerifyBody) -> Self {
        Self {
            attestation_id: body.attestation_id,
            proof: body.proof,
            public_signals: body.public_signals,
            user_context_data: body.user_context_data,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySuccessBody {
    pub status: String,
    pub result: bool,
    /// Released attributes; non-opted ones read "Not disclosed".
    #[schema(value_type = Object)]
    pub credential_subject: Map<String, Value>,
    #[schema(value_type = Object)]
    pub verification_options: VerificationOptions,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyFailureBody {
    pub status: String,
    pub result: bool,
    pub message: String,
    /// `age`, `ofac`, or `general`.
    #[schema(value_type = String)]
    pub failed_check: FailedCheck,
    #[schema(value_type = Object)]
    pub details: ValidityDetails,
}

impl VerifyFailureBody {
    fn new(failed_check: FailedCheck, details: ValidityDetails) -> Self {
        Self {
            status: "error".to_string(),
            result: false,
            message: "Verification failed".to_string(),
            failed_check,
            details,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/verify", post(verify))
}

/// POST /verify — verify a proof and redact the released attributes.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyBody,
    responses(
        (status = 200, description = "Proof valid; redacted attributes", body = VerifySuccessBody),
        (status = 400, description = "Missing fields or failed check", body = VerifyFailureBody),
        (status = 502, description = "Verifier failed", body = crate::error::ErrorBody),
        (status = 503, description = "No verifier configured", body = crate::error::ErrorBody),
    ),
    tag = "verify"
)]
async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let submission = PartialSubmission::from(extract_json(body)?).complete()?;
    let verifier = state
        .verifier
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("proof verifier not configured"))?;

    let result = match verifier.verify(&submission).await {
        Ok(result) => result,
        Err(e) => {
            state.metrics.record_verification(VerificationOutcome::Error);
            return Err(e.into());
        }
    };

    if let Some(check) = result.is_valid_details.first_failure() {
        state.metrics.record_verification(check.into());
        tracing::info!(failed_check = %check, "proof rejected");
        let body = VerifyFailureBody::new(check, result.is_valid_details);
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let config = match result.subject() {
        Ok(subject) => {
            let config = state.store.get_config(&subject).await.map_err(|e| {
                state.metrics.record_verification(VerificationOutcome::Error);
                AppError::from(e)
            })?;
            if config.is_none() {
                tracing::warn!(subject_id = %subject.short(), "no stored config; redacting all attributes");
            }
            config
        }
        Err(_) => {
            tracing::warn!("verifier returned no subject identifier; redacting all attributes");
            None
        }
    };

    let redacted = redact(&result.disclose_output, config.as_ref());
    state.metrics.record_verification(VerificationOutcome::Success);

    Ok(Json(VerifySuccessBody {
        status: "success".to_string(),
        result: true,
        credential_subject: redacted.credential_subject,
        verification_options: redacted.verification_options,
    })
    .into_response())
}
