//! # disclose-store — Config Persistence
//!
//! Durable key/value storage of each subject's `VerificationConfig`.
//!
//! ## Contract
//!
//! - `set_config` is an idempotent whole-value overwrite: last write wins,
//!   nothing is merged.
//! - A failed write leaves the previous value intact.
//! - `get_config` returns the most recent settled write, or `None`.
//! - Nothing here deletes configs. Retention belongs to the backend.
//!
//! ## Backends
//!
//! - `MemoryConfigStore` (`memory.rs`): DashMap, used when `DATABASE_URL` is
//!   unset and in tests.
//! - `PgConfigStore` (`pg.rs`): Postgres via SQLx, one JSONB row per subject.

pub mod error;
pub mod memory;
pub mod pg;

use async_trait::async_trait;
use disclose_core::{SubjectId, VerificationConfig};

pub use error::StoreError;
pub use memory::MemoryConfigStore;
pub use pg::PgConfigStore;

/// Per-subject config persistence.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Overwrite the config stored for `subject`.
    async fn set_config(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), StoreError>;

    /// The config last stored for `subject`, if any.
    async fn get_config(&self, subject: &SubjectId)
        -> Result<Option<VerificationConfig>, StoreError>;
}
