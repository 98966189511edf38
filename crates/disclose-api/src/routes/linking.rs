//! # Deferred Linking Proxy
//!
//! - `POST /deferredLinking` — forward a serialized request to the linking
//!   service and return `{data: token}`.
//!
//! Accepts `{campaignId, campaignSubjectId, serializedRequest}` or the
//! linking service's own `{campaign_id, campaign_user_id, self_app}`.
//! A failed exchange answers 502 with an empty token so callers can treat
//! it as "not ready".

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use disclose_client::DeferredLinkRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Body of `/deferredLinking`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeferredLinkingBody {
    #[serde(rename = "campaignId", alias = "campaign_id")]
    pub campaign_id: String,
    #[serde(rename = "campaignSubjectId", alias = "campaign_user_id")]
    pub campaign_subject_id: String,
    /// JSON-serialized verification request.
    #[serde(rename = "serializedRequest", alias = "self_app")]
    pub serialized_request: String,
}

impl Validate for DeferredLinkingBody {
    fn validate(&self) -> Result<(), AppError> {
        if self.serialized_request.is_empty() {
            return Err(AppError::BadRequest(
                "serializedRequest is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<DeferredLinkingBody> for DeferredLinkRequest {
    fn from(body: DeferredLinkingBody) -> Self {
        Self {
            campaign_id: body.campaign_id,
            campaign_user_id: body.campaign_subject_id,
            self_app: body.serialized_request,
        }
    }
}

/// `{ "data": token }`; empty when no token was issued.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenBody {
    pub data: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/deferredLinking", post(deferred_linking))
}

/// POST /deferredLinking — exchange a serialized request for a link token.
#[utoipa::path(
    post,
    path = "/deferredLinking",
    request_body = DeferredLinkingBody,
    responses(
        (status = 200, description = "Token issued (possibly empty)", body = TokenBody),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 502, description = "Linking service failed; empty token", body = TokenBody),
        (status = 503, description = "Linking service not configured", body = crate::error::ErrorBody),
    ),
    tag = "linking"
)]
async fn deferred_linking(
    State(state): State<AppState>,
    body: Result<Json<DeferredLinkingBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = extract_validated_json(body)?;
    let linking = state
        .linking
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("linking service not configured"))?;

    let request = DeferredLinkRequest::from(body);
    match linking.fetch_token(&request).await {
        Ok(token) => {
            state.metrics.record_link_token(token.is_some());
            let data = token.map(|t| t.as_str().to_string()).unwrap_or_default();
            Ok(Json(TokenBody { data }).into_response())
        }
        Err(e) => {
            state.metrics.record_link_token(false);
            tracing::warn!(
                campaign_id = %request.campaign_id,
                status = ?e.status(),
                error = %e,
                "deferred linking token exchange failed"
            );
            Ok((StatusCode::BAD_GATEWAY, Json(TokenBody { data: String::new() })).into_response())
        }
    }
}
