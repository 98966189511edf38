//! # Options Persistence
//!
//! - `POST /saveOptions` — store `{subjectId, options}` for later redaction.
//!
//! The options object uses the wallet SDK's field names. A config that
//! parses but breaks an invariant (more than 40 distinct excluded countries, age
//! above 99) is a 422; anything that does not parse is a 400.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use disclose_core::{OptionsError, SubjectId, ValidationError, VerificationConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Body of `/saveOptions` and `/v1/request`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveOptionsBody {
    /// Accepted as `subjectId` or `userId`.
    #[serde(rename = "subjectId", alias = "userId")]
    pub subject_id: String,
    /// Disclosure flags plus `minimumAge`, `excludedCountries`, `ofac`.
    #[schema(value_type = Object)]
    pub options: Value,
}

impl Validate for SaveOptionsBody {
    fn validate(&self) -> Result<(), AppError> {
        if self.subject_id.trim().is_empty() {
            return Err(ValidationError::EmptySubjectId.into());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveOptionsResponse {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/saveOptions", post(save_options))
}

/// Parse and validate an options object.
pub(crate) fn parse_options(options: Value) -> Result<VerificationConfig, AppError> {
    VerificationConfig::from_options(options).map_err(|err| match err {
        OptionsError::Malformed(_) => AppError::BadRequest(err.to_string()),
        OptionsError::Invalid(invalid) => invalid.into(),
    })
}

/// POST /saveOptions — persist a subject's verification config.
#[utoipa::path(
    post,
    path = "/saveOptions",
    request_body = SaveOptionsBody,
    responses(
        (status = 200, description = "Options saved", body = SaveOptionsResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Config violates a limit", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "options"
)]
async fn save_options(
    State(state): State<AppState>,
    body: Result<Json<SaveOptionsBody>, JsonRejection>,
) -> Result<Json<SaveOptionsResponse>, AppError> {
    let body = extract_validated_json(body)?;
    let subject = SubjectId::new(body.subject_id)?;
    let config = parse_options(body.options)?.normalized();

    state.store.set_config(&subject, &config).await?;
    state.metrics.record_config_saved();
    tracing::info!(
        subject_id = %subject.short(),
        excluded = config.excluded_countries.len(),
        "verification options saved"
    );

    Ok(Json(SaveOptionsResponse {
        message: "Options saved successfully".to_string(),
    }))
}
