//! Store error types.

/// A store operation failed. The stored value is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored row did not decode as a config.
    #[error("stored config for {subject} is corrupt: {source}")]
    Corrupt {
        subject: String,
        source: serde_json::Error,
    },
    /// The backend refused the operation.
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}
