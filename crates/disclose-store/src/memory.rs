//! In-memory storage backend using DashMap.
//!
//! Cheaply cloneable: all clones share the same map. State does not survive
//! restarts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use disclose_core::{SubjectId, VerificationConfig};

use crate::{ConfigStore, StoreError};

/// A stored config and when it was written.
#[derive(Debug, Clone)]
pub struct StoredConfig {
    pub config: VerificationConfig,
    pub updated_at: DateTime<Utc>,
}

struct Inner {
    configs: DashMap<SubjectId, StoredConfig>,
    read_only: AtomicBool,
}

/// DashMap-backed [`ConfigStore`].
#[derive(Clone)]
pub struct MemoryConfigStore {
    inner: Arc<Inner>,
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                configs: DashMap::new(),
                read_only: AtomicBool::new(false),
            }),
        }
    }

    /// Reject writes with `StoreError::Unavailable` while set.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.configs.is_empty()
    }

    /// The stored entry with its write timestamp.
    pub fn entry(&self, subject: &SubjectId) -> Option<StoredConfig> {
        self.inner.configs.get(subject).map(|e| e.value().clone())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn set_config(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), StoreError> {
        if self.inner.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is read-only".into()));
        }
        self.inner.configs.insert(
            subject.clone(),
            StoredConfig {
                config: config.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_config(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<VerificationConfig>, StoreError> {
        Ok(self.inner.configs.get(subject).map(|e| e.config.clone()))
    }
}
