//! # disclose-core — Disclosure Gate Domain Types
//!
//! The verification-request lifecycle of the disclosure gate, expressed as
//! pure data and pure functions:
//!
//! - **Config** (`config.rs`): `VerificationConfig`, the per-subject declaration
//!   of which attributes may be disclosed and which predicates (minimum age,
//!   excluded countries, OFAC) the proof must satisfy.
//! - **Request** (`request.rs`): `build_request` turns a config plus static
//!   `AppMetadata` into an immutable, content-addressed `VerificationRequest`.
//! - **Link** (`link.rs`): `universal_link` encodes a request into the URI
//!   the holder's wallet opens.
//! - **Gate** (`gate.rs`): ordered evaluation of the verifier's validity flags
//!   (age, then OFAC, then overall).
//! - **Redact** (`redact.rs`): filters raw disclosed attributes against the
//!   stored config before anything is released to the relying party.
//!
//! ## Crate Policy
//!
//! - No I/O. Persistence, HTTP, and async scheduling live in the crates above.
//! - Every function here is deterministic: equal inputs give byte-identical
//!   outputs.

pub mod config;
pub mod country;
pub mod disclosure;
pub mod error;
pub mod gate;
pub mod identity;
pub mod link;
pub mod redact;
pub mod request;

pub use config::{VerificationConfig, MAX_MINIMUM_AGE};
pub use country::{ExcludedCountries, Toggle, MAX_EXCLUDED_COUNTRIES};
pub use disclosure::{Attribute, DisclosureFlags};
pub use error::{OptionsError, ValidationError};
pub use gate::{FailedCheck, ValidityDetails};
pub use identity::{LinkToken, SubjectId};
pub use link::universal_link;
pub use redact::{redact, Redacted, VerificationOptions, NOT_DISCLOSED};
pub use request::{build_request, AppMetadata, EndpointType, RequestDigest, VerificationRequest};
