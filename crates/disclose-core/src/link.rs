//! Universal link generation.
//!
//! The wallet's universal-link scheme carries the whole request as a
//! form-urlencoded JSON document in the `selfApp` query parameter.

use crate::request::VerificationRequest;

/// Base of the wallet's universal link.
pub const REDIRECT_BASE: &str = "https://redirect.self.xyz";

/// Encode `request` into the URI the holder's wallet opens.
///
/// Pure: the same request always yields the same link.
pub fn universal_link(request: &VerificationRequest) -> String {
    let payload: String = url::form_urlencoded::byte_serialize(request.to_json().as_bytes()).collect();
    format!("{REDIRECT_BASE}?selfApp={payload}")
}
