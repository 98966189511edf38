//! # Request Builder
//!
//! `build_request` is a pure, total function of a subject, its config, and
//! static app metadata. The resulting `VerificationRequest` is what the
//! wallet receives; its JSON form is the `selfApp` payload.
//!
//! ## Determinism
//!
//! The request contains no maps and no generated values, so serializing it
//! always produces the same bytes for equal inputs. `digest()` hashes those
//! bytes and can be used as a cache key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::VerificationConfig;
use crate::identity::SubjectId;

/// Transport kind of the verification endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    Https,
    Celo,
    StagingHttps,
    StagingCelo,
}

/// Static relying-party metadata embedded in every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppMetadata {
    pub app_name: String,
    pub scope: String,
    pub endpoint: String,
    pub endpoint_type: EndpointType,
    /// Icon reference (URL or base64 data).
    pub logo: String,
    pub version: u32,
    pub user_defined_data: String,
    pub user_id_type: String,
    pub dev_mode: bool,
}

impl AppMetadata {
    /// Metadata of the hosted playground.
    pub fn playground() -> Self {
        Self {
            app_name: "Self Playground".into(),
            scope: "self-playground".into(),
            endpoint: "https://playground.staging.self.xyz/api/verify".into(),
            endpoint_type: EndpointType::StagingHttps,
            logo: "https://i.imgur.com/Rz8B3s7.png".into(),
            version: 2,
            user_defined_data: "hello from the playground".into(),
            user_id_type: "uuid".into(),
            dev_mode: false,
        }
    }
}

/// Immutable request handed to the holder's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub app_name: String,
    #[serde(rename = "logoBase64")]
    pub logo: String,
    pub endpoint_type: EndpointType,
    pub endpoint: String,
    pub scope: String,
    pub user_id: SubjectId,
    pub user_id_type: String,
    pub dev_mode: bool,
    pub disclosures: VerificationConfig,
    pub version: u32,
    pub user_defined_data: String,
}

/// SHA-256 of a request's canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestDigest([u8; 32]);

impl RequestDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for RequestDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Build the request for `subject` from its config.
///
/// A minimum age of 0 is embedded as "no age requirement".
pub fn build_request(
    metadata: &AppMetadata,
    subject: &SubjectId,
    config: &VerificationConfig,
) -> VerificationRequest {
    VerificationRequest {
        app_name: metadata.app_name.clone(),
        logo: metadata.logo.clone(),
        endpoint_type: metadata.endpoint_type,
        endpoint: metadata.endpoint.clone(),
        scope: metadata.scope.clone(),
        user_id: subject.clone(),
        user_id_type: metadata.user_id_type.clone(),
        dev_mode: metadata.dev_mode,
        disclosures: config.normalized(),
        version: metadata.version,
        user_defined_data: metadata.user_defined_data.clone(),
    }
}

impl VerificationRequest {
    /// Compact JSON, field order fixed by the struct definition.
    pub fn to_json(&self) -> String {
        // Strings, bools, integers and sequences only: serialization cannot fail.
        serde_json::to_string(self).expect("verification request serializes")
    }

    pub fn digest(&self) -> RequestDigest {
        let hash = Sha256::digest(self.to_json().as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        RequestDigest(bytes)
    }
}
