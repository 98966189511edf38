//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Config store**: Postgres when `DATABASE_URL` is set, otherwise the
//!   in-memory DashMap store.
//! - **Proof verifier**: `None` until `VERIFIER_URL` is configured; `/verify`
//!   answers 503 without one.
//! - **Linking client**: proxies `/deferredLinking` to the linking service.

use std::sync::Arc;

use disclose_client::{ClientConfig, LinkingServiceClient};
use disclose_core::{AppMetadata, EndpointType};
use disclose_store::{ConfigStore, MemoryConfigStore};
use disclose_zkp::ProofVerifier;
use sqlx::PgPool;

use crate::middleware::metrics::ApiMetrics;

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub database_url: Option<String>,
    pub linking_service_url: String,
    /// Remote verification service. `None` disables `/verify`.
    pub verifier_url: Option<String>,
    /// Scope proofs must be bound to.
    pub verify_scope: String,
    /// Endpoint proofs must be bound to; also embedded in built requests.
    pub verify_endpoint: String,
    /// Accept mock passports (staging).
    pub mock_passport: bool,
    pub metrics_enabled: bool,
    pub upstream_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let metadata = AppMetadata::playground();
        Self {
            port: 3000,
            database_url: None,
            linking_service_url: disclose_client::config::DEFAULT_LINKING_URL.to_string(),
            verifier_url: None,
            verify_scope: metadata.scope,
            verify_endpoint: metadata.endpoint,
            mock_passport: true,
            metrics_enabled: true,
            upstream_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT").unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL").ok(),
            linking_service_url: std::env::var("LINKING_SERVICE_URL")
                .unwrap_or(defaults.linking_service_url),
            verifier_url: std::env::var("VERIFIER_URL").ok(),
            verify_scope: std::env::var("VERIFY_SCOPE").unwrap_or(defaults.verify_scope),
            verify_endpoint: std::env::var("VERIFY_ENDPOINT").unwrap_or(defaults.verify_endpoint),
            mock_passport: env_flag("MOCK_PASSPORT").unwrap_or(defaults.mock_passport),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
            upstream_timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout_secs),
        }
    }

    /// Request metadata for this deployment.
    pub fn metadata(&self) -> AppMetadata {
        let mut metadata = AppMetadata::playground();
        metadata.scope = self.verify_scope.clone();
        metadata.endpoint = self.verify_endpoint.clone();
        if !self.mock_passport {
            metadata.endpoint_type = EndpointType::Https;
        }
        metadata
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

/// Anything other than `"false"` or `"0"` is true.
fn env_flag(var: &str) -> Option<bool> {
    std::env::var(var)
        .ok()
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0"))
}

/// Shared application state accessible to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub metadata: AppMetadata,
    pub store: Arc<dyn ConfigStore>,
    pub verifier: Option<Arc<dyn ProofVerifier>>,
    pub linking: Option<LinkingServiceClient>,
    pub db_pool: Option<PgPool>,
    pub metrics: ApiMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("verifier", &self.verifier.is_some())
            .field("linking", &self.linking.is_some())
            .field("db_pool", &self.db_pool.is_some())
            .finish()
    }
}

impl AppState {
    /// In-memory store, no verifier, no linking client.
    pub fn new() -> Self {
        Self::with_store(AppConfig::default(), Arc::new(MemoryConfigStore::new()))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            metadata: config.metadata(),
            config,
            store,
            verifier: None,
            linking: None,
            db_pool: None,
            metrics: ApiMetrics::new(),
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn ProofVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_linking(mut self, linking: LinkingServiceClient) -> Self {
        self.linking = Some(linking);
        self
    }

    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Linking client for `config.linking_service_url`.
    pub fn linking_client(config: &AppConfig) -> Result<LinkingServiceClient, disclose_client::ClientError> {
        let mut client_config = ClientConfig::parse(&config.linking_service_url)
            .map_err(|e| disclose_client::ClientError::Config(format!("LINKING_SERVICE_URL: {e}")))?;
        client_config.timeout_secs = config.upstream_timeout_secs;
        LinkingServiceClient::new(client_config)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
