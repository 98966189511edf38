//! # Session Seams
//!
//! `OptionsSink` persists a config; `TokenSource` exchanges a request for a
//! deep-link token. A session runs against the gate's HTTP surface
//! (`GateClient`), directly against the linking service
//! (`LinkingServiceClient`), or against an in-process `ConfigStore`.

use std::sync::Arc;

use async_trait::async_trait;
use disclose_client::{DeferredLinkRequest, GateClient, LinkingServiceClient};
use disclose_core::{LinkToken, SubjectId, VerificationConfig};
use disclose_store::ConfigStore;

use crate::error::SessionError;

/// Where settled configs are written.
#[async_trait]
pub trait OptionsSink: Send + Sync {
    async fn save(&self, subject: &SubjectId, config: &VerificationConfig)
        -> Result<(), SessionError>;
}

/// Where deep-link tokens come from. `Ok(None)` means an empty token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(
        &self,
        request: &DeferredLinkRequest,
    ) -> Result<Option<LinkToken>, SessionError>;
}

#[async_trait]
impl OptionsSink for GateClient {
    async fn save(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), SessionError> {
        Ok(self.save_options(subject, config).await?)
    }
}

#[async_trait]
impl TokenSource for GateClient {
    async fn fetch_token(
        &self,
        request: &DeferredLinkRequest,
    ) -> Result<Option<LinkToken>, SessionError> {
        Ok(self.deferred_linking(request).await?)
    }
}

#[async_trait]
impl TokenSource for LinkingServiceClient {
    async fn fetch_token(
        &self,
        request: &DeferredLinkRequest,
    ) -> Result<Option<LinkToken>, SessionError> {
        Ok(LinkingServiceClient::fetch_token(self, request).await?)
    }
}

/// Persists straight into a [`ConfigStore`].
#[derive(Clone)]
pub struct StoreSink {
    store: Arc<dyn ConfigStore>,
}

impl StoreSink {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OptionsSink for StoreSink {
    async fn save(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), SessionError> {
        config.validate()?;
        self.store.set_config(subject, &config.normalized()).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fakes shared by the session tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;

    /// Records every save; fails every call while `fail` is set.
    #[derive(Default)]
    pub struct RecordingSink {
        pub saves: Mutex<Vec<(SubjectId, VerificationConfig)>>,
        pub fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl OptionsSink for RecordingSink {
        async fn save(
            &self,
            subject: &SubjectId,
            config: &VerificationConfig,
        ) -> Result<(), SessionError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(disclose_store::StoreError::Unavailable("down".into()).into());
            }
            self.saves.lock().push((subject.clone(), config.clone()));
            Ok(())
        }
    }

    /// Answers after `delay` with `token-<n>` where n counts calls, or with
    /// an empty token when `empty` is set.
    pub struct CountingSource {
        pub calls: AtomicUsize,
        pub delay: Duration,
        pub empty: bool,
        pub requests: Mutex<Vec<DeferredLinkRequest>>,
    }

    impl CountingSource {
        pub fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
                empty: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(
            &self,
            request: &DeferredLinkRequest,
        ) -> Result<Option<LinkToken>, SessionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.requests.lock().push(request.clone());
            tokio::time::sleep(self.delay).await;
            if self.empty {
                Ok(None)
            } else {
                Ok(LinkToken::new(format!("token-{n}")))
            }
        }
    }
}
