//! # Verification Session
//!
//! The caller-owned object behind one relying-party session. Every edit
//! re-derives the request and link, schedules a debounced save, and, when
//! the link changed, re-targets the token prefetch at the new link.

use std::sync::Arc;
use std::time::Duration;

use disclose_client::DeferredLinkRequest;
use disclose_core::{
    build_request, universal_link, AppMetadata, Attribute, LinkToken, SubjectId, Toggle,
    ValidationError, VerificationConfig, VerificationRequest,
};

use crate::debounce::{Debouncer, SaveStatus, DEFAULT_DEBOUNCE};
use crate::error::SessionError;
use crate::prefetch::{PrefetchState, TokenPrefetcher};
use crate::selection::CountrySelection;
use crate::sink::{OptionsSink, TokenSource};

/// One subject's live verification session.
pub struct VerificationSession {
    subject: SubjectId,
    metadata: AppMetadata,
    config: VerificationConfig,
    request: VerificationRequest,
    link: String,
    selection: Option<CountrySelection>,
    debouncer: Debouncer,
    prefetcher: TokenPrefetcher,
}

impl VerificationSession {
    /// Start a session for a fresh subject with the default config.
    pub fn start(
        metadata: AppMetadata,
        sink: Arc<dyn OptionsSink>,
        source: Arc<dyn TokenSource>,
    ) -> Self {
        Self::with_config(
            SubjectId::generate(),
            metadata,
            VerificationConfig::playground_default(),
            sink,
            source,
            DEFAULT_DEBOUNCE,
        )
    }

    pub fn with_config(
        subject: SubjectId,
        metadata: AppMetadata,
        config: VerificationConfig,
        sink: Arc<dyn OptionsSink>,
        source: Arc<dyn TokenSource>,
        debounce: Duration,
    ) -> Self {
        let request = build_request(&metadata, &subject, &config);
        let link = universal_link(&request);
        let session = Self {
            subject,
            metadata,
            config,
            request,
            link,
            selection: None,
            debouncer: Debouncer::new(sink, debounce),
            prefetcher: TokenPrefetcher::new(source),
        };
        tracing::info!(subject_id = %session.subject.short(), "verification session started");
        session.prefetch();
        session
            .debouncer
            .schedule(session.subject.clone(), session.config.clone());
        session
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn request(&self) -> &VerificationRequest {
        &self.request
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    /// Flip one disclosure flag; returns its new value.
    pub fn toggle_disclosure(&mut self, attr: Attribute) -> bool {
        let disclosed = self.config.disclosures.toggle(attr);
        self.changed();
        disclosed
    }

    /// Set the age threshold. 0 disables the check; above 99 is rejected.
    pub fn set_minimum_age(&mut self, age: u32) -> Result<(), ValidationError> {
        self.config.set_minimum_age(age)?;
        self.changed();
        Ok(())
    }

    pub fn toggle_ofac(&mut self) -> bool {
        self.config.ofac = !self.config.ofac;
        self.changed();
        self.config.ofac
    }

    /// Open a draft of the excluded set. Reopening discards an open draft.
    pub fn begin_country_selection(&mut self) -> &mut CountrySelection {
        self.selection
            .insert(CountrySelection::new(&self.config.excluded_countries))
    }

    pub fn country_selection(&self) -> Option<&CountrySelection> {
        self.selection.as_ref()
    }

    /// Toggle a country in the open draft.
    pub fn toggle_country(&mut self, entry: &str) -> Result<Toggle, SessionError> {
        let selection = self.selection.as_mut().ok_or(SessionError::NoSelection)?;
        Ok(selection.toggle(entry)?)
    }

    /// Commit the open draft into the config.
    pub fn apply_country_selection(&mut self) -> Result<(), SessionError> {
        let selection = self.selection.take().ok_or(SessionError::NoSelection)?;
        self.config.excluded_countries = selection.apply()?;
        self.changed();
        Ok(())
    }

    /// Discard the open draft.
    pub fn cancel_country_selection(&mut self) {
        self.selection = None;
    }

    /// Wait for the prefetched token of the current link.
    pub async fn token(&self) -> Option<LinkToken> {
        self.prefetcher.token().await
    }

    pub fn prefetch_state(&self) -> PrefetchState {
        self.prefetcher.state()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.debouncer.status()
    }

    /// Opening the wallet needs both the link and its token.
    pub fn ready_to_open(&self) -> bool {
        !self.link.is_empty() && self.prefetcher.state().token().is_some()
    }

    /// Persist the current config now, dropping any pending debounced write.
    pub async fn flush(&self) -> Result<(), SessionError> {
        self.debouncer.flush(&self.subject, &self.config).await
    }

    /// Tear the session down. Pending writes and fetches are discarded.
    pub fn end(self) {
        tracing::info!(subject_id = %self.subject.short(), "verification session ended");
    }

    fn changed(&mut self) {
        let request = build_request(&self.metadata, &self.subject, &self.config);
        if request != self.request {
            self.link = universal_link(&request);
            self.request = request;
            self.prefetch();
        }
        self.debouncer
            .schedule(self.subject.clone(), self.config.clone());
    }

    fn prefetch(&self) {
        self.prefetcher.trigger(
            &self.subject,
            &self.link,
            DeferredLinkRequest::for_request(&self.request),
        );
    }
}

impl Drop for VerificationSession {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.prefetcher.cancel();
    }
}
