//! Postgres storage backend.
//!
//! One row per subject in `verification_configs`; the config is stored as
//! JSONB in its options shape. Writes are single-statement upserts, so a
//! failed write never leaves a partial row.

use async_trait::async_trait;
use chrono::Utc;
use disclose_core::{SubjectId, VerificationConfig};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;

use crate::{ConfigStore, StoreError};

/// Connect to `url` and run the embedded migrations.
pub async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Postgres-backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn set_config(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO verification_configs (subject_id, config, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (subject_id)
             DO UPDATE SET config = EXCLUDED.config, updated_at = EXCLUDED.updated_at",
        )
        .bind(subject.as_str())
        .bind(Json(config))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_config(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<VerificationConfig>, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT config FROM verification_configs WHERE subject_id = $1")
                .bind(subject.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(value,)| {
            serde_json::from_value(value).map_err(|source| {
                tracing::error!(subject_id = %subject, error = %source, "stored config does not decode");
                StoreError::Corrupt {
                    subject: subject.to_string(),
                    source,
                }
            })
        })
        .transpose()
    }
}
