//! # Options Arguments
//!
//! Shared flags that describe a `VerificationConfig`: start from a JSON
//! options file (or the playground default) and apply overrides on top.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use disclose_core::country::save_country_selection;
use disclose_core::{Attribute, DisclosureFlags, ExcludedCountries, SubjectId, VerificationConfig};

/// Flags describing a subject and its verification config.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionsArgs {
    /// Subject identifier. A fresh UUID when omitted.
    #[arg(long)]
    pub subject: Option<String>,

    /// JSON options file in the wallet SDK's field names.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Attributes to disclose (e.g. `nationality,name`). Replaces the file's flags.
    #[arg(long, value_delimiter = ',')]
    pub disclose: Vec<String>,

    /// Minimum age; 0 disables the check.
    #[arg(long)]
    pub min_age: Option<u32>,

    /// Turn the OFAC check off.
    #[arg(long)]
    pub no_ofac: bool,

    /// Countries to exclude, by code or English name. Replaces the file's set.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

impl OptionsArgs {
    pub fn subject(&self) -> Result<SubjectId> {
        match &self.subject {
            Some(id) => SubjectId::new(id.as_str()).context("invalid --subject"),
            None => Ok(SubjectId::generate()),
        }
    }

    /// Build the config: file or default, then overrides.
    pub fn config(&self) -> Result<VerificationConfig> {
        let mut config = match &self.options {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid options in {}", path.display()))?
            }
            None => VerificationConfig::playground_default(),
        };

        if !self.disclose.is_empty() {
            let mut attrs = Vec::with_capacity(self.disclose.len());
            for name in &self.disclose {
                match Attribute::parse(name.trim()) {
                    Some(attr) => attrs.push(attr),
                    None => bail!("unknown attribute: {name}"),
                }
            }
            config.disclosures = DisclosureFlags::only(&attrs);
        }
        if let Some(age) = self.min_age {
            config.set_minimum_age(age)?;
        }
        if self.no_ofac {
            config.ofac = false;
        }
        if !self.exclude.is_empty() {
            let codes = save_country_selection(self.exclude.iter().map(String::as_str));
            config.excluded_countries = ExcludedCountries::new(codes)?;
        }

        config.validate()?;
        Ok(config)
    }
}
