//! # Countries
//!
//! Fixed ISO 3166-1 alpha-3 code table, the capped excluded-country set, and
//! the selection-commit mapping used when a draft selection is applied.
//!
//! Excluded-country entries are stored as the wallet SDK hands them over:
//! usually 3-letter codes, sometimes display names. `code_for_entry` maps
//! either form back to the public code.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Upper bound on the excluded-country set.
pub const MAX_EXCLUDED_COUNTRIES: usize = 40;

/// Starter exclusion set for new sessions.
pub const DEFAULT_EXCLUDED: [&str; 6] = ["IRN", "IRQ", "PRK", "RUS", "SYR", "VEN"];

/// (code, display name), sorted by code.
const COUNTRIES: &[(&str, &str)] = &[
    ("ABW", "Aruba"),
    ("AFG", "Afghanistan"),
    ("AGO", "Angola"),
    ("AIA", "Anguilla"),
    ("ALA", "Aland Islands"),
    ("ALB", "Albania"),
    ("AND", "Andorra"),
    ("ARE", "United Arab Emirates"),
    ("ARG", "Argentina"),
    ("ARM", "Armenia"),
    ("ASM", "American Samoa"),
    ("ATA", "Antarctica"),
    ("ATF", "French Southern Territories"),
    ("ATG", "Antigua and Barbuda"),
    ("AUS", "Australia"),
    ("AUT", "Austria"),
    ("AZE", "Azerbaijan"),
    ("BDI", "Burundi"),
    ("BEL", "Belgium"),
    ("BEN", "Benin"),
    ("BES", "Bonaire, Sint Eustatius and Saba"),
    ("BFA", "Burkina Faso"),
    ("BGD", "Bangladesh"),
    ("BGR", "Bulgaria"),
    ("BHR", "Bahrain"),
    ("BHS", "Bahamas"),
    ("BIH", "Bosnia and Herzegovina"),
    ("BLM", "Saint Barthelemy"),
    ("BLR", "Belarus"),
    ("BLZ", "Belize"),
    ("BMU", "Bermuda"),
    ("BOL", "Bolivia"),
    ("BRA", "Brazil"),
    ("BRB", "Barbados"),
    ("BRN", "Brunei Darussalam"),
    ("BTN", "Bhutan"),
    ("BVT", "Bouvet Island"),
    ("BWA", "Botswana"),
    ("CAF", "Central African Republic"),
    ("CAN", "Canada"),
    ("CCK", "Cocos (Keeling) Islands"),
    ("CHE", "Switzerland"),
    ("CHL", "Chile"),
    ("CHN", "China"),
    ("CIV", "Cote d'Ivoire"),
    ("CMR", "Cameroon"),
    ("COD", "Congo, Democratic Republic of the"),
    ("COG", "Congo"),
    ("COK", "Cook Islands"),
    ("COL", "Colombia"),
    ("COM", "Comoros"),
    ("CPV", "Cabo Verde"),
    ("CRI", "Costa Rica"),
    ("CUB", "Cuba"),
    ("CUW", "Curacao"),
    ("CXR", "Christmas Island"),
    ("CYM", "Cayman Islands"),
    ("CYP", "Cyprus"),
    ("CZE", "Czechia"),
    ("DEU", "Germany"),
    ("DJI", "Djibouti"),
    ("DMA", "Dominica"),
    ("DNK", "Denmark"),
    ("DOM", "Dominican Republic"),
    ("DZA", "Algeria"),
    ("ECU", "Ecuador"),
    ("EGY", "Egypt"),
    ("ERI", "Eritrea"),
    ("ESH", "Western Sahara"),
    ("ESP", "Spain"),
    ("EST", "Estonia"),
    ("ETH", "Ethiopia"),
    ("FIN", "Finland"),
    ("FJI", "Fiji"),
    ("FLK", "Falkland Islands (Malvinas)"),
    ("FRA", "France"),
    ("FRO", "Faroe Islands"),
    ("FSM", "Micronesia (Federated States of)"),
    ("GAB", "Gabon"),
    ("GBR", "United Kingdom"),
    ("GEO", "Georgia"),
    ("GGY", "Guernsey"),
    ("GHA", "Ghana"),
    ("GIB", "Gibraltar"),
    ("GIN", "Guinea"),
    ("GLP", "Guadeloupe"),
    ("GMB", "Gambia"),
    ("GNB", "Guinea-Bissau"),
    ("GNQ", "Equatorial Guinea"),
    ("GRC", "Greece"),
    ("GRD", "Grenada"),
    ("GRL", "Greenland"),
    ("GTM", "Guatemala"),
    ("GUF", "French Guiana"),
    ("GUM", "Guam"),
    ("GUY", "Guyana"),
    ("HKG", "Hong Kong"),
    ("HMD", "Heard Island and McDonald Islands"),
    ("HND", "Honduras"),
    ("HRV", "Croatia"),
    ("HTI", "Haiti"),
    ("HUN", "Hungary"),
    ("IDN", "Indonesia"),
    ("IMN", "Isle of Man"),
    ("IND", "India"),
    ("IOT", "British Indian Ocean Territory"),
    ("IRL", "Ireland"),
    ("IRN", "Iran"),
    ("IRQ", "Iraq"),
    ("ISL", "Iceland"),
    ("ISR", "Israel"),
    ("ITA", "Italy"),
    ("JAM", "Jamaica"),
    ("JEY", "Jersey"),
    ("JOR", "Jordan"),
    ("JPN", "Japan"),
    ("KAZ", "Kazakhstan"),
    ("KEN", "Kenya"),
    ("KGZ", "Kyrgyzstan"),
    ("KHM", "Cambodia"),
    ("KIR", "Kiribati"),
    ("KNA", "Saint Kitts and Nevis"),
    ("KOR", "Korea, Republic of"),
    ("KWT", "Kuwait"),
    ("LAO", "Lao People's Democratic Republic"),
    ("LBN", "Lebanon"),
    ("LBR", "Liberia"),
    ("LBY", "Libya"),
    ("LCA", "Saint Lucia"),
    ("LIE", "Liechtenstein"),
    ("LKA", "Sri Lanka"),
    ("LSO", "Lesotho"),
    ("LTU", "Lithuania"),
    ("LUX", "Luxembourg"),
    ("LVA", "Latvia"),
    ("MAC", "Macao"),
    ("MAF", "Saint Martin (French part)"),
    ("MAR", "Morocco"),
    ("MCO", "Monaco"),
    ("MDA", "Moldova"),
    ("MDG", "Madagascar"),
    ("MDV", "Maldives"),
    ("MEX", "Mexico"),
    ("MHL", "Marshall Islands"),
    ("MKD", "North Macedonia"),
    ("MLI", "Mali"),
    ("MLT", "Malta"),
    ("MMR", "Myanmar"),
    ("MNE", "Montenegro"),
    ("MNG", "Mongolia"),
    ("MNP", "Northern Mariana Islands"),
    ("MOZ", "Mozambique"),
    ("MRT", "Mauritania"),
    ("MSR", "Montserrat"),
    ("MTQ", "Martinique"),
    ("MUS", "Mauritius"),
    ("MWI", "Malawi"),
    ("MYS", "Malaysia"),
    ("MYT", "Mayotte"),
    ("NAM", "Namibia"),
    ("NCL", "New Caledonia"),
    ("NER", "Niger"),
    ("NFK", "Norfolk Island"),
    ("NGA", "Nigeria"),
    ("NIC", "Nicaragua"),
    ("NIU", "Niue"),
    ("NLD", "Netherlands"),
    ("NOR", "Norway"),
    ("NPL", "Nepal"),
    ("NRU", "Nauru"),
    ("NZL", "New Zealand"),
    ("OMN", "Oman"),
    ("PAK", "Pakistan"),
    ("PAN", "Panama"),
    ("PCN", "Pitcairn"),
    ("PER", "Peru"),
    ("PHL", "Philippines"),
    ("PLW", "Palau"),
    ("PNG", "Papua New Guinea"),
    ("POL", "Poland"),
    ("PRI", "Puerto Rico"),
    ("PRK", "North Korea"),
    ("PRT", "Portugal"),
    ("PRY", "Paraguay"),
    ("PSE", "Palestine, State of"),
    ("PYF", "French Polynesia"),
    ("QAT", "Qatar"),
    ("REU", "Reunion"),
    ("ROU", "Romania"),
    ("RUS", "Russia"),
    ("RWA", "Rwanda"),
    ("SAU", "Saudi Arabia"),
    ("SDN", "Sudan"),
    ("SEN", "Senegal"),
    ("SGP", "Singapore"),
    ("SGS", "South Georgia and the South Sandwich Islands"),
    ("SHN", "Saint Helena, Ascension and Tristan da Cunha"),
    ("SJM", "Svalbard and Jan Mayen"),
    ("SLB", "Solomon Islands"),
    ("SLE", "Sierra Leone"),
    ("SLV", "El Salvador"),
    ("SMR", "San Marino"),
    ("SOM", "Somalia"),
    ("SPM", "Saint Pierre and Miquelon"),
    ("SRB", "Serbia"),
    ("SSD", "South Sudan"),
    ("STP", "Sao Tome and Principe"),
    ("SUR", "Suriname"),
    ("SVK", "Slovakia"),
    ("SVN", "Slovenia"),
    ("SWE", "Sweden"),
    ("SWZ", "Eswatini"),
    ("SXM", "Sint Maarten (Dutch part)"),
    ("SYC", "Seychelles"),
    ("SYR", "Syrian Arab Republic"),
    ("TCA", "Turks and Caicos Islands"),
    ("TCD", "Chad"),
    ("TGO", "Togo"),
    ("THA", "Thailand"),
    ("TJK", "Tajikistan"),
    ("TKL", "Tokelau"),
    ("TKM", "Turkmenistan"),
    ("TLS", "Timor-Leste"),
    ("TON", "Tonga"),
    ("TTO", "Trinidad and Tobago"),
    ("TUN", "Tunisia"),
    ("TUR", "Turkey"),
    ("TUV", "Tuvalu"),
    ("TWN", "Taiwan"),
    ("TZA", "Tanzania"),
    ("UGA", "Uganda"),
    ("UKR", "Ukraine"),
    ("UMI", "United States Minor Outlying Islands"),
    ("URY", "Uruguay"),
    ("USA", "United States"),
    ("UZB", "Uzbekistan"),
    ("VAT", "Holy See"),
    ("VCT", "Saint Vincent and the Grenadines"),
    ("VEN", "Venezuela"),
    ("VGB", "Virgin Islands (British)"),
    ("VIR", "Virgin Islands (U.S.)"),
    ("VNM", "Viet Nam"),
    ("VUT", "Vanuatu"),
    ("WLF", "Wallis and Futuna"),
    ("WSM", "Samoa"),
    ("YEM", "Yemen"),
    ("ZAF", "South Africa"),
    ("ZMB", "Zambia"),
    ("ZWE", "Zimbabwe"),
];

/// Display name for a 3-letter code.
pub fn name_for_code(code: &str) -> Option<&'static str> {
    COUNTRIES
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|i| COUNTRIES[i].1)
}

/// 3-letter code for an exact display name.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    COUNTRIES.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
}

/// Case-insensitive substring search over display names.
pub fn search(query: &str) -> Vec<(&'static str, &'static str)> {
    let needle = query.to_lowercase();
    COUNTRIES
        .iter()
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// Every (code, name) pair in the table.
pub fn all() -> &'static [(&'static str, &'static str)] {
    COUNTRIES
}

/// Translate a stored entry to its public code. Unknown entries pass through.
pub fn code_for_entry(entry: &str) -> String {
    code_for_name(entry)
        .map(str::to_string)
        .unwrap_or_else(|| entry.to_string())
}

/// Commit a draft selection: display names become codes, known codes stay,
/// anything else falls back to its first three characters uppercased.
pub fn save_country_selection<'a>(selected: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    selected
        .into_iter()
        .map(|entry| {
            if let Some(code) = code_for_name(entry) {
                code.to_string()
            } else if name_for_code(entry).is_some() {
                entry.to_string()
            } else {
                entry.chars().take(3).collect::<String>().to_uppercase()
            }
        })
        .collect()
}

/// Outcome of a toggle on the excluded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered, duplicate-free set of excluded countries, at most
/// [`MAX_EXCLUDED_COUNTRIES`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExcludedCountries(Vec<String>);

impl ExcludedCountries {
    /// Build from entries, dropping duplicates. Rejects sets over the cap
    /// instead of truncating them.
    pub fn new<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Vec::new();
        for entry in entries {
            let entry: String = entry.into();
            if entry.trim().is_empty() {
                return Err(ValidationError::EmptyCountry);
            }
            if !set.contains(&entry) {
                set.push(entry);
            }
        }
        if set.len() > MAX_EXCLUDED_COUNTRIES {
            return Err(ValidationError::too_many_countries());
        }
        Ok(Self(set))
    }

    /// The starter set used for new sessions.
    pub fn starter() -> Self {
        Self(DEFAULT_EXCLUDED.iter().map(|c| c.to_string()).collect())
    }

    /// Remove if present, otherwise add. Adding past the cap is rejected and
    /// leaves the set unchanged.
    pub fn toggle(&mut self, entry: &str) -> Result<Toggle, ValidationError> {
        if let Some(pos) = self.0.iter().position(|e| e == entry) {
            self.0.remove(pos);
            return Ok(Toggle::Removed);
        }
        if entry.trim().is_empty() {
            return Err(ValidationError::EmptyCountry);
        }
        if self.0.len() >= MAX_EXCLUDED_COUNTRIES {
            return Err(ValidationError::too_many_countries());
        }
        self.0.push(entry.to_string());
        Ok(Toggle::Added)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.iter().any(|e| e == entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Entries translated to public codes.
    pub fn public_codes(&self) -> Vec<String> {
        self.0.iter().map(|e| code_for_entry(e)).collect()
    }
}

impl<'de> Deserialize<'de> for ExcludedCountries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<String>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn table_is_sorted_by_code() {
        assert!(COUNTRIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn lookups_both_directions() {
        assert_eq!(name_for_code("FRA"), Some("France"));
        assert_eq!(code_for_name("Iran"), Some("IRN"));
        assert_eq!(name_for_code("XXX"), None);
    }

    #[test]
    fn entries_translate_names_and_pass_codes_through() {
        assert_eq!(code_for_entry("North Korea"), "PRK");
        assert_eq!(code_for_entry("IRQ"), "IRQ");
        assert_eq!(code_for_entry("Atlantis"), "Atlantis");
    }

    #[test]
    fn save_selection_round_trips_codes_via_names() {
        let codes = ["IRN", "IRQ", "PRK", "SYR"];
        let names: Vec<&str> = codes.iter().map(|c| name_for_code(c).unwrap()).collect();
        assert_eq!(save_country_selection(names), codes);
    }

    #[test]
    fn save_selection_stubs_unknown_names() {
        assert_eq!(save_country_selection(["atlantis"]), vec!["ATL"]);
        assert_eq!(save_country_selection(["USA"]), vec!["USA"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let hits = search("KOREA");
        assert!(hits.contains(&("PRK", "North Korea")));
        assert!(hits.contains(&("KOR", "Korea, Republic of")));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = ExcludedCountries::default();
        assert_eq!(set.toggle("FRA"), Ok(Toggle::Added));
        assert!(set.contains("FRA"));
        assert_eq!(set.toggle("FRA"), Ok(Toggle::Removed));
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_past_cap_is_rejected_without_change() {
        let codes: Vec<&str> = COUNTRIES.iter().take(40).map(|(c, _)| *c).collect();
        let mut set = ExcludedCountries::new(codes).unwrap();
        let before = set.clone();
        assert_eq!(set.toggle("ZWE"), Err(ValidationError::too_many_countries()));
        assert_eq!(set, before);
        // removal still works at the cap
        assert_eq!(set.toggle("ABW"), Ok(Toggle::Removed));
        assert_eq!(set.toggle("ZWE"), Ok(Toggle::Added));
    }

    #[test]
    fn new_dedupes_and_rejects_oversized() {
        let set = ExcludedCountries::new(["IRN", "IRN", "IRQ"]).unwrap();
        assert_eq!(set.len(), 2);
        let codes: Vec<&str> = COUNTRIES.iter().take(41).map(|(c, _)| *c).collect();
        assert_eq!(
            ExcludedCountries::new(codes),
            Err(ValidationError::too_many_countries())
        );
    }

    #[test]
    fn deserialize_enforces_cap() {
        let json = serde_json::to_string(
            &COUNTRIES.iter().take(41).map(|(c, _)| *c).collect::<Vec<_>>(),
        )
        .unwrap();
        assert!(serde_json::from_str::<ExcludedCountries>(&json).is_err());
        let ok: ExcludedCountries = serde_json::from_str(r#"["IRN","IRQ"]"#).unwrap();
        assert_eq!(ok.len(), 2);
    }

    proptest! {
        #[test]
        fn cap_holds_after_any_toggle_sequence(picks in proptest::collection::vec(0usize..COUNTRIES.len(), 0..200)) {
            let mut set = ExcludedCountries::starter();
            for i in picks {
                let _ = set.toggle(COUNTRIES[i].0);
                prop_assert!(set.len() <= MAX_EXCLUDED_COUNTRIES);
            }
        }
    }
}
