//! # Validation Errors
//!
//! Errors raised synchronously while building or mutating a verification
//! config, or while checking a proof submission for completeness. None of
//! these ever reach an external dependency.

use thiserror::Error;

use crate::country::MAX_EXCLUDED_COUNTRIES;

/// A config or submission was rejected before any external call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Adding another country would exceed the exclusion cap.
    #[error("Maximum {max} countries can be excluded")]
    TooManyCountries {
        /// The cap that was hit.
        max: usize,
    },

    /// Minimum age outside `0..=99`.
    #[error("minimum age must be between 0 and 99, got {0}")]
    MinimumAgeOutOfRange(u32),

    /// Subject identifiers must be non-empty.
    #[error("subject identifier must not be empty")]
    EmptySubjectId,

    /// A country entry was empty or whitespace.
    #[error("excluded country entries must not be empty")]
    EmptyCountry,

    /// One or more required fields were absent.
    #[error("{0} are required")]
    MissingFields(String),
}

/// Why an options object was refused.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The object does not have the options shape.
    #[error("invalid options: {0}")]
    Malformed(serde_json::Error),

    /// The object parsed but breaks a limit.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl PartialEq for OptionsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Invalid(a), Self::Invalid(b)) => a == b,
            (Self::Malformed(a), Self::Malformed(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl ValidationError {
    /// The boundary error surfaced when the exclusion cap is hit.
    pub fn too_many_countries() -> Self {
        Self::TooManyCountries {
            max: MAX_EXCLUDED_COUNTRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_cap_message_matches_boundary_text() {
        assert_eq!(
            ValidationError::too_many_countries().to_string(),
            "Maximum 40 countries can be excluded"
        );
    }

    #[test]
    fn missing_fields_message() {
        let err = ValidationError::MissingFields("Proof, publicSignals".into());
        assert_eq!(err.to_string(), "Proof, publicSignals are required");
    }
}
