//! # Disclosure Redaction
//!
//! The last step before anything leaves the gate. The verifier returns every
//! attribute the proof reveals; `redact` keeps only those the subject's
//! *stored* config opts into and replaces the rest with [`NOT_DISCLOSED`].
//!
//! Keys the gate does not know about pass through untouched.
//!
//! With no stored config every known attribute is redacted and the echoed
//! options are empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::VerificationConfig;
use crate::disclosure::Attribute;

/// Sentinel substituted for withheld attributes.
pub const NOT_DISCLOSED: &str = "Not disclosed";

/// Options echoed back alongside the released attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u8>,
    pub ofac: bool,
    /// Public 3-letter codes.
    pub excluded_countries: Vec<String>,
}

impl VerificationOptions {
    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            minimum_age: config.effective_minimum_age(),
            ofac: config.ofac,
            excluded_countries: config.excluded_countries.public_codes(),
        }
    }
}

/// Output of [`redact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redacted {
    pub credential_subject: Map<String, Value>,
    pub verification_options: VerificationOptions,
}

/// Filter `disclosed` against `config`.
pub fn redact(disclosed: &Map<String, Value>, config: Option<&VerificationConfig>) -> Redacted {
    let mut subject = disclosed.clone();
    for attr in Attribute::ALL {
        let allowed = config.is_some_and(|c| c.disclosures.is_disclosed(attr));
        if !allowed {
            subject.insert(attr.output_key().to_string(), Value::from(NOT_DISCLOSED));
        }
    }
    Redacted {
        credential_subject: subject,
        verification_options: config.map(VerificationOptions::from_config).unwrap_or_default(),
    }
}
