//! # Debounced Persistence
//!
//! Every `schedule` call bumps a generation counter and restarts the quiet
//! window. When a window elapses the task writes only if its generation is
//! still current, so of several edits inside one window only the last is
//! persisted.
//!
//! Once a task has started writing it is no longer cancellable; a newer
//! write queues behind it on the save lock so writes land in edit order.

use std::sync::Arc;
use std::time::Duration;

use disclose_core::{SubjectId, VerificationConfig};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::sink::OptionsSink;

/// Quiet window between the last edit and the write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Where the most recent edit stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing scheduled yet.
    Idle,
    /// Waiting for the window to elapse.
    Pending,
    Saving,
    Saved,
    /// The write failed; the store keeps its previous value.
    Failed(String),
}

struct State {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Generation-token debounced writer for one subject's config.
pub struct Debouncer {
    sink: Arc<dyn OptionsSink>,
    window: Duration,
    state: Arc<Mutex<State>>,
    save_lock: Arc<tokio::sync::Mutex<()>>,
    status: Arc<watch::Sender<SaveStatus>>,
}

impl Debouncer {
    pub fn new(sink: Arc<dyn OptionsSink>, window: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            sink,
            window,
            state: Arc::new(Mutex::new(State {
                generation: 0,
                pending: None,
            })),
            save_lock: Arc::new(tokio::sync::Mutex::new(())),
            status: Arc::new(status),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Restart the window with `config` as the value to write.
    pub fn schedule(&self, subject: SubjectId, config: VerificationConfig) {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        let generation = state.generation;
        self.status.send_replace(SaveStatus::Pending);

        let sink = Arc::clone(&self.sink);
        let shared = Arc::clone(&self.state);
        let save_lock = Arc::clone(&self.save_lock);
        let status = Arc::clone(&self.status);
        let window = self.window;

        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            {
                let mut state = shared.lock();
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }
            let _guard = save_lock.lock().await;
            status.send_replace(SaveStatus::Saving);
            let result = sink.save(&subject, &config).await;
            let current = shared.lock().generation == generation;
            match result {
                Ok(()) => {
                    tracing::debug!(subject_id = %subject.short(), generation, "saved options");
                    if current {
                        status.send_replace(SaveStatus::Saved);
                    }
                }
                Err(e) => {
                    tracing::warn!(subject_id = %subject.short(), error = %e, "failed to save options");
                    if current {
                        status.send_replace(SaveStatus::Failed(e.to_string()));
                    }
                }
            }
        }));
    }

    /// Drop any pending write and write `config` now.
    pub async fn flush(
        &self,
        subject: &SubjectId,
        config: &VerificationConfig,
    ) -> Result<(), SessionError> {
        let generation = self.supersede();
        let _guard = self.save_lock.lock().await;
        self.status.send_replace(SaveStatus::Saving);
        let result = self.sink.save(subject, config).await;
        if self.state.lock().generation == generation {
            self.status.send_replace(match &result {
                Ok(()) => SaveStatus::Saved,
                Err(e) => SaveStatus::Failed(e.to_string()),
            });
        }
        result
    }

    /// Drop any pending write.
    pub fn cancel(&self) {
        self.supersede();
        let _ = self.status.send_if_modified(|status| {
            if *status == SaveStatus::Pending {
                *status = SaveStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    fn supersede(&self) -> u64 {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        state.generation
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.state.lock().pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::sink::testing::RecordingSink;

    fn subject() -> SubjectId {
        SubjectId::new("debounce-subject").unwrap()
    }

    fn config_with_age(age: u8) -> VerificationConfig {
        VerificationConfig {
            minimum_age: Some(age),
            ..VerificationConfig::default()
        }
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn two_edits_in_window_write_once_with_latest_state() {
        let sink = Arc::new(RecordingSink::default());
        let debouncer = Debouncer::new(sink.clone(), DEFAULT_DEBOUNCE);

        debouncer.schedule(subject(), config_with_age(18)); // t = 0
        settle(100).await;
        debouncer.schedule(subject(), config_with_age(21)); // t = 100

        settle(498).await; // t = 598
        assert!(sink.saves.lock().is_empty());

        settle(10).await; // t = 608
        let saves = sink.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].1.minimum_age, Some(21));
    }

    #[tokio::test(start_paused = true)]
    async fn separated_edits_write_twice() {
        let sink = Arc::new(RecordingSink::default());
        let debouncer = Debouncer::new(sink.clone(), DEFAULT_DEBOUNCE);

        debouncer.schedule(subject(), config_with_age(18));
        settle(600).await;
        debouncer.schedule(subject(), config_with_age(30));
        settle(600).await;

        let ages: Vec<_> = sink.saves.lock().iter().map(|(_, c)| c.minimum_age).collect();
        assert_eq!(ages, vec![Some(18), Some(30)]);
        assert_eq!(debouncer.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_write() {
        let sink = Arc::new(RecordingSink::default());
        let debouncer = Debouncer::new(sink.clone(), DEFAULT_DEBOUNCE);

        debouncer.schedule(subject(), config_with_age(18));
        assert_eq!(debouncer.status(), SaveStatus::Pending);
        debouncer.cancel();
        settle(1_000).await;

        assert!(sink.saves.lock().is_empty());
        assert_eq!(debouncer.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_now_and_supersedes_pending() {
        let sink = Arc::new(RecordingSink::default());
        let debouncer = Debouncer::new(sink.clone(), DEFAULT_DEBOUNCE);

        debouncer.schedule(subject(), config_with_age(18));
        debouncer.flush(&subject(), &config_with_age(40)).await.unwrap();
        settle(1_000).await;

        let saves = sink.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].1.minimum_age, Some(40));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_reported_in_status() {
        let sink = Arc::new(RecordingSink::default());
        sink.fail.store(true, Ordering::SeqCst);
        let debouncer = Debouncer::new(sink.clone(), DEFAULT_DEBOUNCE);

        debouncer.schedule(subject(), config_with_age(18));
        settle(600).await;

        assert!(matches!(debouncer.status(), SaveStatus::Failed(_)));
    }
}
