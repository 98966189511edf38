//! # Middleware Stack
//!
//! - [`metrics`]: Prometheus request metrics plus the gate's domain counters.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly in [`crate::app`].

pub mod metrics;
