//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Domain counters (verification outcomes, saved configs, link
//! tokens) are incremented by the handlers that produce them.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{core::Collector, Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    verifications_total: IntCounterVec,
    configs_saved_total: IntCounter,
    link_tokens_total: IntCounterVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

/// Outcome label of `disclose_verifications_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success,
    Age,
    Ofac,
    General,
    Error,
}

impl VerificationOutcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Age => "age",
            Self::Ofac => "ofac",
            Self::General => "general",
            Self::Error => "error",
        }
    }
}

impl From<disclose_core::FailedCheck> for VerificationOutcome {
    fn from(check: disclose_core::FailedCheck) -> Self {
        match check {
            disclose_core::FailedCheck::Age => Self::Age,
            disclose_core::FailedCheck::Ofac => Self::Ofac,
            disclose_core::FailedCheck::General => Self::General,
        }
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("disclose_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "disclose_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("disclose_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let verifications_total = IntCounterVec::new(
            Opts::new(
                "disclose_verifications_total",
                "Proof verifications by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");

        let configs_saved_total = IntCounter::new(
            "disclose_configs_saved_total",
            "Verification configs persisted",
        )
        .expect("metric can be created");

        let link_tokens_total = IntCounterVec::new(
            Opts::new(
                "disclose_link_tokens_total",
                "Deferred-linking token exchanges by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(verifications_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(configs_saved_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(link_tokens_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                verifications_total,
                configs_saved_total,
                link_tokens_total,
            }),
        }
    }

    /// Total request count across all labels.
    pub fn requests(&self) -> u64 {
        sum_counters(&self.inner.http_requests_total)
    }

    /// Total error count across all labels.
    pub fn errors(&self) -> u64 {
        sum_counters(&self.inner.http_errors_total)
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    pub fn record_verification(&self, outcome: VerificationOutcome) {
        self.inner
            .verifications_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_config_saved(&self) {
        self.inner.configs_saved_total.inc();
    }

    /// `ready` when a token came back, `empty` otherwise.
    pub fn record_link_token(&self, ready: bool) {
        let outcome = if ready { "ready" } else { "empty" };
        self.inner
            .link_tokens_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn verifications(&self, outcome: VerificationOutcome) -> u64 {
        self.inner
            .verifications_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    pub fn configs_saved(&self) -> u64 {
        self.inner.configs_saved_total.get()
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn sum_counters(vec: &IntCounterVec) -> u64 {
    vec.collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Records HTTP request metrics, labelled by the matched route.
///
/// Unmatched paths share one label.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        m.record_request(&method, &path, response.status().as_u16(), duration);
    }

    response
}
