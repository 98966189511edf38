//! Draft editor for the excluded-country set.
//!
//! Edits happen on a copy; nothing reaches the session's config until
//! `apply`. Hitting the cap leaves the draft unchanged and records the
//! boundary message for display.

use disclose_core::country::{self, save_country_selection};
use disclose_core::{ExcludedCountries, Toggle, ValidationError};

/// In-progress country selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySelection {
    draft: ExcludedCountries,
    error: Option<String>,
}

impl CountrySelection {
    pub fn new(current: &ExcludedCountries) -> Self {
        Self {
            draft: current.clone(),
            error: None,
        }
    }

    /// Toggle `entry` (a code or display name) in the draft.
    pub fn toggle(&mut self, entry: &str) -> Result<Toggle, ValidationError> {
        match self.draft.toggle(entry) {
            Ok(outcome) => {
                self.error = None;
                Ok(outcome)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Boundary message from the last rejected toggle.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &ExcludedCountries {
        &self.draft
    }

    pub fn is_selected(&self, entry: &str) -> bool {
        self.draft.contains(entry)
    }

    /// Table rows matching `query`, each with its selection state.
    pub fn search(&self, query: &str) -> Vec<(&'static str, &'static str, bool)> {
        country::search(query)
            .into_iter()
            .map(|(code, name)| (code, name, self.is_selected(code) || self.is_selected(name)))
            .collect()
    }

    /// Commit the draft: names become codes, unknown entries fall back to
    /// their first three characters uppercased.
    pub fn apply(self) -> Result<ExcludedCountries, ValidationError> {
        ExcludedCountries::new(save_country_selection(self.draft.iter()))
    }
}
