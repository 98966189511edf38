//! # disclose-cli — Disclosure Gate Command-Line Interface
//!
//! ## Subcommands
//!
//! - `link` — build the request, universal link and digest (locally, or via the gate with `--remote`)
//! - `save` — persist options through the gate
//! - `token` — fetch a deep-link token (via the gate or the linking service)
//! - `verify` — submit a proof file to the gate
//! - `session` — run a full session: save, prefetch, print link and token
//!
//! Argument parsing lives here; behavior comes from the domain crates.

pub mod gate;
pub mod link;
pub mod options;
pub mod session;
