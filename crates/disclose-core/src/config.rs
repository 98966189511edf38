//! # Verification Config
//!
//! One `VerificationConfig` exists per subject. Its JSON form is the
//! "options" object posted to `/saveOptions` and persisted by the store:
//! the seven disclosure flags flattened alongside `minimumAge`,
//! `excludedCountries`, and `ofac`.

use serde::{Deserialize, Serialize};

use crate::country::ExcludedCountries;
use crate::disclosure::{Attribute, DisclosureFlags};
use crate::error::{OptionsError, ValidationError};

/// Highest accepted minimum age.
pub const MAX_MINIMUM_AGE: u8 = 99;

/// Default age threshold for new sessions.
pub const DEFAULT_MINIMUM_AGE: u8 = 18;

/// A subject's disclosure declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(flatten)]
    pub disclosures: DisclosureFlags,

    /// `None` or `Some(0)` disables the age check.
    #[serde(rename = "minimumAge", default, skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u8>,

    #[serde(rename = "excludedCountries", default)]
    pub excluded_countries: ExcludedCountries,

    #[serde(default)]
    pub ofac: bool,
}

/// Wire form of the options object before limits are checked.
#[derive(Deserialize)]
struct RawOptions {
    #[serde(flatten)]
    disclosures: DisclosureFlags,
    #[serde(rename = "minimumAge", default)]
    minimum_age: Option<u32>,
    #[serde(rename = "excludedCountries", default)]
    excluded_countries: Vec<String>,
    #[serde(default)]
    ofac: bool,
}

impl VerificationConfig {
    /// Parse a posted options object. Shape errors are
    /// [`OptionsError::Malformed`]; a well-formed object that breaks a limit
    /// is [`OptionsError::Invalid`]. Duplicate countries are dropped before
    /// the cap is applied.
    pub fn from_options(options: serde_json::Value) -> Result<Self, OptionsError> {
        let raw: RawOptions = serde_json::from_value(options).map_err(OptionsError::Malformed)?;
        let mut config = Self {
            disclosures: raw.disclosures,
            minimum_age: None,
            excluded_countries: ExcludedCountries::new(raw.excluded_countries)?,
            ofac: raw.ofac,
        };
        if let Some(age) = raw.minimum_age {
            config.set_minimum_age(age)?;
        }
        Ok(config)
    }

    /// Session starting point: nationality disclosed, age 18, the starter
    /// exclusion set, OFAC on.
    pub fn playground_default() -> Self {
        Self {
            disclosures: DisclosureFlags::only(&[Attribute::Nationality]),
            minimum_age: Some(DEFAULT_MINIMUM_AGE),
            excluded_countries: ExcludedCountries::starter(),
            ofac: true,
        }
    }

    /// Check invariants that serde alone does not enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(age) = self.minimum_age {
            if age > MAX_MINIMUM_AGE {
                return Err(ValidationError::MinimumAgeOutOfRange(u32::from(age)));
            }
        }
        Ok(())
    }

    /// The age requirement with 0 folded into "none".
    pub fn effective_minimum_age(&self) -> Option<u8> {
        self.minimum_age.filter(|age| *age > 0)
    }

    /// Copy with the age requirement normalized.
    pub fn normalized(&self) -> Self {
        Self {
            minimum_age: self.effective_minimum_age(),
            ..self.clone()
        }
    }

    /// Set the age threshold; 0 disables it.
    pub fn set_minimum_age(&mut self, age: u32) -> Result<(), ValidationError> {
        if age > u32::from(MAX_MINIMUM_AGE) {
            return Err(ValidationError::MinimumAgeOutOfRange(age));
        }
        self.minimum_age = Some(age as u8);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_session_start() {
        let config = VerificationConfig::playground_default();
        assert!(config.disclosures.nationality);
        assert!(!config.disclosures.name);
        assert_eq!(config.minimum_age, Some(18));
        assert!(config.ofac);
        assert_eq!(config.excluded_countries.len(), 6);
        assert!(config.excluded_countries.contains("PRK"));
    }

    #[test]
    fn serializes_in_options_shape() {
        let config = VerificationConfig::playground_default();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["nationality"], true);
        assert_eq!(value["passport_number"], false);
        assert_eq!(value["minimumAge"], 18);
        assert_eq!(value["ofac"], true);
        assert_eq!(value["excludedCountries"][0], "IRN");
    }

    #[test]
    fn zero_age_normalizes_to_none() {
        let mut config = VerificationConfig::playground_default();
        config.set_minimum_age(0).unwrap();
        assert_eq!(config.effective_minimum_age(), None);
        let value = serde_json::to_value(config.normalized()).unwrap();
        assert!(value.get("minimumAge").is_none());
    }

    #[test]
    fn age_above_99_rejected() {
        let mut config = VerificationConfig::default();
        assert_eq!(
            config.set_minimum_age(100),
            Err(ValidationError::MinimumAgeOutOfRange(100))
        );
        let parsed: VerificationConfig = serde_json::from_str(r#"{"minimumAge": 120}"#).unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn options_age_out_of_u8_range_is_a_limit_violation() {
        let err = VerificationConfig::from_options(serde_json::json!({ "minimumAge": 300 }))
            .unwrap_err();
        assert_eq!(
            err,
            OptionsError::Invalid(ValidationError::MinimumAgeOutOfRange(300))
        );
        let err = VerificationConfig::from_options(serde_json::json!({ "minimumAge": 150 }))
            .unwrap_err();
        assert!(matches!(err, OptionsError::Invalid(_)));
    }

    #[test]
    fn options_duplicates_do_not_count_toward_cap() {
        let mut codes: Vec<String> = (0..40).map(|i| format!("C{i:02}")).collect();
        codes.push(codes[0].clone());
        let config =
            VerificationConfig::from_options(serde_json::json!({ "excludedCountries": codes }))
                .unwrap();
        assert_eq!(config.excluded_countries.len(), 40);
    }

    #[test]
    fn options_over_cap_after_dedup_rejected() {
        let codes: Vec<String> = (0..41).map(|i| format!("C{i:02}")).collect();
        let err = VerificationConfig::from_options(serde_json::json!({ "excludedCountries": codes }))
            .unwrap_err();
        assert_eq!(err, OptionsError::Invalid(ValidationError::too_many_countries()));
    }

    #[test]
    fn options_wrong_types_are_malformed() {
        let err = VerificationConfig::from_options(serde_json::json!({ "ofac": "yes" }))
            .unwrap_err();
        assert!(matches!(err, OptionsError::Malformed(_)));
        let err = VerificationConfig::from_options(serde_json::json!({ "minimumAge": -1 }))
            .unwrap_err();
        assert!(matches!(err, OptionsError::Malformed(_)));
    }

    #[test]
    fn missing_fields_default() {
        let parsed: VerificationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, VerificationConfig::default());
    }
}
