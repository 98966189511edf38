//! # Request Preview
//!
//! - `POST /v1/request` — build the verification request, universal link,
//!   and request digest for a config, using this deployment's metadata.
//!
//! Pure: nothing is persisted. Identical bodies give identical replies.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use disclose_core::{build_request, universal_link, SubjectId, VerificationRequest};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::routes::options::{parse_options, SaveOptionsBody};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestPreviewBody {
    /// The request the wallet will receive.
    #[schema(value_type = Object)]
    pub request: VerificationRequest,
    pub link: String,
    /// Hex SHA-256 of the serialized request.
    pub digest: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/request", post(build_preview))
}

/// POST /v1/request — build request, link and digest for a config.
#[utoipa::path(
    post,
    path = "/v1/request",
    request_body = SaveOptionsBody,
    responses(
        (status = 200, description = "Request and link", body = RequestPreviewBody),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Config violates a limit", body = crate::error::ErrorBody),
    ),
    tag = "request"
)]
async fn build_preview(
    State(state): State<AppState>,
    body: Result<Json<SaveOptionsBody>, JsonRejection>,
) -> Result<Json<RequestPreviewBody>, AppError> {
    let body = extract_validated_json(body)?;
    let subject = SubjectId::new(body.subject_id)?;
    let config = parse_options(body.options)?;

    let request = build_request(&state.metadata, &subject, &config);
    let link = universal_link(&request);
    let digest = request.digest().to_hex();
    tracing::debug!(subject_id = %subject.short(), digest = %digest, "request preview built");

    Ok(Json(RequestPreviewBody {
        request,
        link,
        digest,
    }))
}
