//! # disclose-client — HTTP Clients
//!
//! - `LinkingServiceClient` (`linking.rs`) exchanges a serialized request for
//!   a deep-link token at the external linking service.
//! - `GateClient` (`gate.rs`) talks to a running disclosure gate:
//!   `/saveOptions`, `/deferredLinking`, `/verify`, `/v1/request`.
//!
//! Wire types shared by both live in `types.rs`. Neither client retries;
//! callers own retry policy.

pub mod config;
pub mod error;
pub mod gate;
pub mod linking;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use gate::GateClient;
pub use linking::LinkingServiceClient;
pub use types::{
    DeferredLinkRequest, RequestPreview, SaveOptionsRequest, TokenResponse, VerifyFailure,
    VerifyResponse, VerifySuccess,
};
