//! Session error types.

use disclose_client::ClientError;
use disclose_core::ValidationError;
use disclose_store::StoreError;

/// Errors surfaced by session operations and their sinks.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The edit was rejected before anything changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Persisting or fetching over HTTP failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Persisting to an in-process store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No country selection is open.
    #[error("no country selection in progress")]
    NoSelection,
}
