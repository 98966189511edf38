//! # disclose-session — Verification Session
//!
//! A `VerificationSession` owns one subject's in-progress config and
//! everything derived from it: the request, its universal link, and the
//! prefetched deep-link token. It is created at session start, torn down at
//! session end, and never shared between sessions.
//!
//! ## Async Discipline
//!
//! Two background activities run per session:
//!
//! - **Debounced persistence** (`debounce.rs`): each edit restarts a quiet
//!   window; only the last edit in a window is written.
//! - **Token prefetch** (`prefetch.rs`): one in-flight fetch per
//!   (subject, link) pair; a reply for a superseded pair is discarded.
//!
//! Both carry a generation counter. A result is applied only if its
//! generation still matches; locks are never held across an await.
//!
//! Mutating session methods spawn onto the current Tokio runtime and must be
//! called from within one.

pub mod debounce;
pub mod error;
pub mod prefetch;
pub mod selection;
pub mod session;
pub mod sink;

pub use debounce::{Debouncer, SaveStatus, DEFAULT_DEBOUNCE};
pub use error::SessionError;
pub use prefetch::{PrefetchState, TokenPrefetcher};
pub use selection::CountrySelection;
pub use session::VerificationSession;
pub use sink::{OptionsSink, StoreSink, TokenSource};
