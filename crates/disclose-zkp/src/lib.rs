//! # disclose-zkp — Proof Verifier Seam
//!
//! The disclosure gate never checks proofs itself. It hands a complete
//! submission to a `ProofVerifier` and receives validity flags plus the raw
//! attributes the proof reveals.
//!
//! ## Architecture
//!
//! - **Types** (`types.rs`): `ProofSubmission` (with the completeness check
//!   that runs before any call out), `ProofResult`, `UserData`.
//! - **Traits** (`traits.rs`): the `ProofVerifier` trait and `VerifierError`.
//! - **Mock** (`mock.rs`): `MockProofVerifier`, a canned-result verifier that
//!   counts its calls.
//! - **HTTP** (`http.rs`): `HttpProofVerifier`, a reqwest client for a remote
//!   verification service.
//!
//! ## Crate Policy
//!
//! - No retries. A failed call is surfaced once.
//! - Proof, public signals and attestation id are opaque JSON here.

pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;
pub mod types;

pub use http::{HttpProofVerifier, VerifierConfig};
#[cfg(feature = "mock")]
pub use mock::MockProofVerifier;
pub use traits::{ProofVerifier, VerifierError};
pub use types::{PartialSubmission, ProofResult, ProofSubmission, UserData};
