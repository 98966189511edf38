//! # disclose-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the disclosure gate.
//! Binds to `PORT` (default 3000).

use std::sync::Arc;

use anyhow::Context;
use disclose_api::state::{AppConfig, AppState};
use disclose_store::{ConfigStore, MemoryConfigStore, PgConfigStore};
use disclose_zkp::{HttpProofVerifier, VerifierConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(?config, "configuration loaded");

    let (store, db_pool) = match &config.database_url {
        Some(url) => {
            let pool = disclose_store::pg::connect(url)
                .await
                .context("database initialization failed")?;
            tracing::info!("using Postgres config store");
            let store: Arc<dyn ConfigStore> = Arc::new(PgConfigStore::new(pool.clone()));
            (store, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; configs are kept in memory only");
            let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
            (store, None)
        }
    };

    let mut state = AppState::with_store(config.clone(), store);
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }

    match &config.verifier_url {
        Some(url) => {
            let mut verifier_config =
                VerifierConfig::new(url, &config.verify_scope, &config.verify_endpoint);
            verifier_config.mock_passport = config.mock_passport;
            verifier_config.timeout_secs = config.upstream_timeout_secs;
            let verifier =
                HttpProofVerifier::new(verifier_config).context("failed to create proof verifier")?;
            tracing::info!(url = %url, "proof verifier configured");
            state = state.with_verifier(Arc::new(verifier));
        }
        None => {
            tracing::warn!("VERIFIER_URL not set; /verify will return 503");
        }
    }

    let linking = AppState::linking_client(&config).context("failed to create linking client")?;
    state = state.with_linking(linking);

    let app = disclose_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("disclosure gate listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filter (default `info`); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
