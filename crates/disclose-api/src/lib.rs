//! # disclose-api — Axum Service for the Disclosure Gate
//!
//! Stores each subject's disclosure config, proxies deep-link token
//! exchange, and verifies proofs, releasing only the attributes the
//! subject opted into.
//!
//! ## API Surface
//!
//! | Path               | Module                  | Purpose                  |
//! |--------------------|-------------------------|--------------------------|
//! | `/saveOptions`     | [`routes::options`]     | Persist a config         |
//! | `/deferredLinking` | [`routes::linking`]     | Link token exchange      |
//! | `/verify`          | [`routes::verify`]      | Verify and redact        |
//! | `/v1/request`      | [`routes::request`]     | Request and link preview |
//! | `/openapi.json`    | [`openapi`]             | OpenAPI spec             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full router.
///
/// Health probes and `/metrics` sit outside the metrics middleware.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    let metrics_on = state.config.metrics_enabled;

    let mut api = Router::new()
        .merge(routes::options::router())
        .merge(routes::linking::router())
        .merge(routes::verify::router())
        .merge(routes::request::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(Extension(metrics): Extension<ApiMetrics>) -> impl IntoResponse {
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}

async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe.
///
/// Checks the database connection when one is configured. A missing
/// verifier does not fail readiness; `/verify` answers 503 on its own.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }
    (StatusCode::OK, "ready").into_response()
}
