//! # Disclosure Flags
//!
//! The seven document attributes a relying party may ask to see, and the
//! per-attribute opt-in flags. Each attribute has two names: the flag name
//! used in the options payload (`passport_number`) and the key the verifier
//! uses in its disclosed output (`idNumber`).

use serde::{Deserialize, Serialize};

/// A disclosable document attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    IssuingState,
    Name,
    Nationality,
    DateOfBirth,
    PassportNumber,
    Gender,
    ExpiryDate,
}

impl Attribute {
    /// Every attribute, in payload order.
    pub const ALL: [Attribute; 7] = [
        Attribute::IssuingState,
        Attribute::Name,
        Attribute::Nationality,
        Attribute::DateOfBirth,
        Attribute::PassportNumber,
        Attribute::Gender,
        Attribute::ExpiryDate,
    ];

    /// Name of the flag in the options payload.
    pub fn flag_name(self) -> &'static str {
        match self {
            Self::IssuingState => "issuing_state",
            Self::Name => "name",
            Self::Nationality => "nationality",
            Self::DateOfBirth => "date_of_birth",
            Self::PassportNumber => "passport_number",
            Self::Gender => "gender",
            Self::ExpiryDate => "expiry_date",
        }
    }

    /// Key of the attribute in the verifier's disclosed output.
    pub fn output_key(self) -> &'static str {
        match self {
            Self::IssuingState => "issuingState",
            Self::Name => "name",
            Self::Nationality => "nationality",
            Self::DateOfBirth => "dateOfBirth",
            Self::PassportNumber => "idNumber",
            Self::Gender => "gender",
            Self::ExpiryDate => "expiryDate",
        }
    }

    /// Human label, as shown next to the checkbox.
    pub fn label(self) -> &'static str {
        match self {
            Self::IssuingState => "Issuing State",
            Self::Name => "Name",
            Self::Nationality => "Nationality",
            Self::DateOfBirth => "Date of Birth",
            Self::PassportNumber => "Passport Number",
            Self::Gender => "Gender",
            Self::ExpiryDate => "Expiry Date",
        }
    }

    /// Parse either the flag name or the output key.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.flag_name() == name || a.output_key() == name)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// Per-attribute disclosure opt-in. Absent flags deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureFlags {
    pub issuing_state: bool,
    pub name: bool,
    pub nationality: bool,
    pub date_of_birth: bool,
    pub passport_number: bool,
    pub gender: bool,
    pub expiry_date: bool,
}

impl DisclosureFlags {
    /// Flags with only the given attributes disclosed.
    pub fn only(attrs: &[Attribute]) -> Self {
        let mut flags = Self::default();
        for attr in attrs {
            flags.set(*attr, true);
        }
        flags
    }

    pub fn is_disclosed(&self, attr: Attribute) -> bool {
        *self.slot(attr)
    }

    pub fn set(&mut self, attr: Attribute, disclosed: bool) {
        *self.slot_mut(attr) = disclosed;
    }

    /// Flip one flag, returning its new value.
    pub fn toggle(&mut self, attr: Attribute) -> bool {
        let slot = self.slot_mut(attr);
        *slot = !*slot;
        *slot
    }

    /// Attributes currently opted in.
    pub fn disclosed(&self) -> impl Iterator<Item = Attribute> + '_ {
        Attribute::ALL
            .into_iter()
            .filter(move |a| self.is_disclosed(*a))
    }

    fn slot(&self, attr: Attribute) -> &bool {
        match attr {
            Attribute::IssuingState => &self.issuing_state,
            Attribute::Name => &self.name,
            Attribute::Nationality => &self.nationality,
            Attribute::DateOfBirth => &self.date_of_birth,
            Attribute::PassportNumber => &self.passport_number,
            Attribute::Gender => &self.gender,
            Attribute::ExpiryDate => &self.expiry_date,
        }
    }

    fn slot_mut(&mut self, attr: Attribute) -> &mut bool {
        match attr {
            Attribute::IssuingState => &mut self.issuing_state,
            Attribute::Name => &mut self.name,
            Attribute::Nationality => &mut self.nationality,
            Attribute::DateOfBirth => &mut self.date_of_birth,
            Attribute::PassportNumber => &mut self.passport_number,
            Attribute::Gender => &mut self.gender,
            Attribute::ExpiryDate => &mut self.expiry_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_names() {
        assert_eq!(Attribute::parse("passport_number"), Some(Attribute::PassportNumber));
        assert_eq!(Attribute::parse("idNumber"), Some(Attribute::PassportNumber));
        assert_eq!(Attribute::parse("dateOfBirth"), Some(Attribute::DateOfBirth));
        assert_eq!(Attribute::parse("shoe_size"), None);
    }

    #[test]
    fn toggle_flips_and_reports_new_value() {
        let mut flags = DisclosureFlags::default();
        assert!(flags.toggle(Attribute::Gender));
        assert!(flags.is_disclosed(Attribute::Gender));
        assert!(!flags.toggle(Attribute::Gender));
        assert!(!flags.is_disclosed(Attribute::Gender));
    }

    #[test]
    fn absent_flags_deserialize_false() {
        let flags: DisclosureFlags = serde_json::from_str(r#"{"name": true}"#).unwrap();
        assert!(flags.name);
        assert!(!flags.nationality);
        assert!(!flags.expiry_date);
    }

    #[test]
    fn only_sets_exactly_the_listed_flags() {
        let flags = DisclosureFlags::only(&[Attribute::Nationality, Attribute::Name]);
        let disclosed: Vec<_> = flags.disclosed().collect();
        assert_eq!(disclosed, vec![Attribute::Name, Attribute::Nationality]);
    }
}
