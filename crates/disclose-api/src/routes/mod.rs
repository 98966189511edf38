//! # API Route Modules
//!
//! - `options` — `POST /saveOptions`: persist a subject's disclosure config.
//! - `linking` — `POST /deferredLinking`: proxy the deep-link token exchange.
//! - `verify` — `POST /verify`: run the proof through the verifier, gate on
//!   validity, redact against the stored config.
//! - `request` — `POST /v1/request`: build the request and link server-side.

pub mod linking;
pub mod options;
pub mod request;
pub mod verify;
