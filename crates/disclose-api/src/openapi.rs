//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI spec, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the gate's API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Disclosure Gate API",
        version = "0.1.0",
        description = "Selective-disclosure verification gate.\n\nProvides:\n- **Options persistence**: per-subject disclosure configs\n- **Deferred linking**: deep-link token exchange with the linking service\n- **Verification**: proof validity gating and redaction of non-opted attributes\n- **Request preview**: server-side request and universal link construction\n\nHealth probes (`/health/*`) and `/metrics` are served alongside."
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    paths(
        crate::routes::options::save_options,
        crate::routes::linking::deferred_linking,
        crate::routes::verify::verify,
        crate::routes::request::build_preview,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::options::SaveOptionsBody,
            crate::routes::options::SaveOptionsResponse,
            crate::routes::linking::DeferredLinkingBody,
            crate::routes::linking::TokenBody,
            crate::routes::verify::VerifyBody,
            crate::routes::verify::VerifySuccessBody,
            crate::routes::verify::VerifyFailureBody,
            crate::routes::request::RequestPreviewBody,
        )
    ),
    tags(
        (name = "options", description = "Per-subject disclosure config persistence"),
        (name = "linking", description = "Deferred deep-link token exchange"),
        (name = "verify", description = "Proof verification, validity gating, and attribute redaction"),
        (name = "request", description = "Verification request and universal link construction"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
