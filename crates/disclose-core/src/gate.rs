//! # Validity Gate
//!
//! The verifier reports three independent validity flags. The gate checks
//! them in a fixed priority order and reports only the first failure:
//!
//! 1. minimum age
//! 2. OFAC screening
//! 3. overall proof validity
//!
//! Attributes are released only when all three pass.

use serde::{Deserialize, Serialize};

/// Validity flags as returned by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityDetails {
    pub is_valid: bool,
    pub is_minimum_age_valid: bool,
    pub is_ofac_valid: bool,
}

impl ValidityDetails {
    /// All checks passing.
    pub const fn passing() -> Self {
        Self {
            is_valid: true,
            is_minimum_age_valid: true,
            is_ofac_valid: true,
        }
    }

    /// The first failing check, in gate order.
    pub fn first_failure(&self) -> Option<FailedCheck> {
        if !self.is_minimum_age_valid {
            Some(FailedCheck::Age)
        } else if !self.is_ofac_valid {
            Some(FailedCheck::Ofac)
        } else if !self.is_valid {
            Some(FailedCheck::General)
        } else {
            None
        }
    }

    pub fn passes(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// Which predicate rejected a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedCheck {
    Age,
    Ofac,
    General,
}

impl FailedCheck {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Ofac => "ofac",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for FailedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
