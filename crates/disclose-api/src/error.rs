//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps validation, store, and verifier errors to HTTP status codes with a
//! JSON body carrying an error code and message. Internal and upstream
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use disclose_core::{ValidationError, MAX_MINIMUM_AGE};
use disclose_store::StoreError;
use disclose_zkp::VerifierError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "BAD_REQUEST", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed body or missing required fields (400).
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed body violating a config invariant (422).
    #[error("{0}")]
    Validation(ValidationError),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// Verifier or linking service failed (502).
    #[error("upstream error: {0}")]
    UpstreamError(String),

    /// Dependency not configured or unreachable (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::ServiceUnavailable(msg.to_string())
    }

    /// The limit a 422 broke, for the `details` field.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(ValidationError::TooManyCountries { max }) => {
                Some(serde_json::json!({ "field": "excludedCountries", "max": max }))
            }
            Self::Validation(ValidationError::MinimumAgeOutOfRange(got)) => Some(serde_json::json!({
                "field": "minimumAge",
                "max": MAX_MINIMUM_AGE,
                "got": got,
            })),
            Self::Validation(ValidationError::EmptyCountry) => {
                Some(serde_json::json!({ "field": "excludedCountries" }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::UpstreamError(_) => "An upstream service error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::UpstreamError(_) => tracing::error!(error = %self, "upstream error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFields(_) | ValidationError::EmptySubjectId => {
                Self::BadRequest(err.to_string())
            }
            _ => Self::Validation(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => Self::ServiceUnavailable(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<VerifierError> for AppError {
    fn from(err: VerifierError) -> Self {
        Self::UpstreamError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn bad_request_status_code() {
        let (status, code) = AppError::BadRequest("missing".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn validation_status_code() {
        let (status, code) =
            AppError::Validation(ValidationError::too_many_countries()).status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn upstream_error_status_code() {
        let (status, code) = AppError::UpstreamError("timeout".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_ERROR");
    }

    #[test]
    fn service_unavailable_status_code() {
        let (status, code) = AppError::service_unavailable("no verifier").status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn country_cap_maps_to_validation() {
        let err: AppError = ValidationError::too_many_countries().into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Maximum 40 countries can be excluded");
    }

    #[tokio::test]
    async fn validation_response_names_the_limit() {
        let resp = AppError::from(ValidationError::too_many_countries()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["details"]["field"], "excludedCountries");
        assert_eq!(body["error"]["details"]["max"], 40);
    }

    #[tokio::test]
    async fn age_response_reports_the_rejected_value() {
        let resp = AppError::from(ValidationError::MinimumAgeOutOfRange(300)).into_response();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["details"]["max"], 99);
        assert_eq!(body["error"]["details"]["got"], 300);
    }

    #[tokio::test]
    async fn bad_request_has_no_details() {
        let resp = AppError::BadRequest("missing".into()).into_response();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn missing_fields_map_to_bad_request() {
        let err: AppError = ValidationError::MissingFields("Proof".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn store_unavailable_maps_to_503() {
        let err: AppError = StoreError::Unavailable("read-only".into()).into();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn internal_error_hides_message() {
        let resp = AppError::Internal("db password wrong".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(!String::from_utf8_lossy(&bytes).contains("password"));
    }

    #[tokio::test]
    async fn upstream_error_hides_message() {
        let resp = AppError::UpstreamError("verifier at 10.0.0.3 refused".into()).into_response();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "An upstream service error occurred");
    }
}
