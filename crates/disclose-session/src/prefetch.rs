//! # Token Prefetch
//!
//! Obtains the deep-link token for the session's current (subject, link)
//! pair before the holder asks for it.
//!
//! ```text
//! Idle ──trigger──▶ Fetching ──token──▶ Ready
//!                       │
//!                       └──error/empty──▶ Failed
//! ```
//!
//! - At most one fetch is in flight per (subject, link) pair. Re-triggering
//!   the same pair is a no-op in every state, including `Failed`: there is no
//!   automatic retry.
//! - Triggering a different pair, or cancelling, supersedes the current
//!   fetch. Its reply is discarded on arrival.

use std::sync::Arc;

use disclose_client::DeferredLinkRequest;
use disclose_core::{LinkToken, SubjectId};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sink::TokenSource;

/// Prefetch state for the current (subject, link) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchState {
    Idle,
    Fetching,
    Ready(LinkToken),
    Failed,
}

impl PrefetchState {
    pub fn token(&self) -> Option<&LinkToken> {
        match self {
            Self::Ready(token) => Some(token),
            _ => None,
        }
    }
}

struct Scope {
    generation: u64,
    key: Option<(SubjectId, String)>,
    task: Option<JoinHandle<()>>,
}

/// Single-flight, cancellable token fetcher.
pub struct TokenPrefetcher {
    source: Arc<dyn TokenSource>,
    scope: Arc<Mutex<Scope>>,
    state: Arc<watch::Sender<PrefetchState>>,
}

impl TokenPrefetcher {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        let (state, _) = watch::channel(PrefetchState::Idle);
        Self {
            source,
            scope: Arc::new(Mutex::new(Scope {
                generation: 0,
                key: None,
                task: None,
            })),
            state: Arc::new(state),
        }
    }

    /// Start fetching for `(subject, link)` unless that pair is already in
    /// scope. Empty links never trigger a fetch.
    pub fn trigger(&self, subject: &SubjectId, link: &str, request: DeferredLinkRequest) {
        if link.is_empty() {
            return;
        }
        let mut scope = self.scope.lock();
        if let Some((s, l)) = &scope.key {
            if s == subject && l == link {
                return;
            }
        }

        scope.generation += 1;
        if let Some(task) = scope.task.take() {
            task.abort();
        }
        scope.key = Some((subject.clone(), link.to_string()));
        let generation = scope.generation;
        self.state.send_replace(PrefetchState::Fetching);

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.scope);
        let state = Arc::clone(&self.state);
        let short = subject.short().to_string();

        scope.task = Some(tokio::spawn(async move {
            let result = source.fetch_token(&request).await;
            let mut scope = shared.lock();
            if scope.generation != generation {
                tracing::debug!(subject_id = %short, generation, "discarding superseded token reply");
                return;
            }
            scope.task = None;
            let next = match result {
                Ok(Some(token)) => {
                    tracing::debug!(subject_id = %short, "link token ready");
                    PrefetchState::Ready(token)
                }
                Ok(None) => {
                    tracing::warn!(subject_id = %short, "linking service returned an empty token");
                    PrefetchState::Failed
                }
                Err(e) => {
                    tracing::warn!(subject_id = %short, error = %e, "link token fetch failed");
                    PrefetchState::Failed
                }
            };
            state.send_replace(next);
        }));
    }

    /// Supersede any fetch and return to `Idle`.
    pub fn cancel(&self) {
        let mut scope = self.scope.lock();
        scope.generation += 1;
        scope.key = None;
        if let Some(task) = scope.task.take() {
            task.abort();
        }
        self.state.send_replace(PrefetchState::Idle);
    }

    pub fn state(&self) -> PrefetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PrefetchState> {
        self.state.subscribe()
    }

    /// Wait for the in-flight fetch, if any, and return the token.
    ///
    /// `None` when idle, failed, or cancelled while waiting.
    pub async fn token(&self) -> Option<LinkToken> {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|state| !matches!(state, PrefetchState::Fetching))
            .await
            .ok()?;
        settled.token().cloned()
    }
}

impl Drop for TokenPrefetcher {
    fn drop(&mut self) {
        if let Some(task) = self.scope.lock().task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sink::testing::CountingSource;

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    fn request(user: &str) -> DeferredLinkRequest {
        DeferredLinkRequest {
            campaign_id: "self-playground".into(),
            campaign_user_id: user.into(),
            self_app: "{}".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_triggers_make_one_call() {
        let source = Arc::new(CountingSource::new(Duration::from_millis(200)));
        let prefetcher = TokenPrefetcher::new(source.clone());
        let id = subject("u-1");

        prefetcher.trigger(&id, "link-a", request("u-1"));
        prefetcher.trigger(&id, "link-a", request("u-1"));
        assert_eq!(prefetcher.state(), PrefetchState::Fetching);

        let (a, b) = tokio::join!(prefetcher.token(), prefetcher.token());
        assert_eq!(source.calls(), 1);
        assert_eq!(a, b);
        assert_eq!(a.unwrap().as_str(), "token-1");
    }

    #[tokio::test(start_paused = true)]
    async fn late_reply_for_old_link_is_discarded() {
        let source = Arc::new(CountingSource::new(Duration::from_millis(200)));
        let prefetcher = TokenPrefetcher::new(source.clone());
        let id = subject("u-1");

        prefetcher.trigger(&id, "link-a", request("u-1"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        prefetcher.trigger(&id, "link-b", request("u-1"));

        let token = prefetcher.token().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(token.as_str(), "token-2");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(prefetcher.state(), PrefetchState::Ready(token));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_is_not_retried_for_same_inputs() {
        let mut source = CountingSource::new(Duration::from_millis(10));
        source.empty = true;
        let source = Arc::new(source);
        let prefetcher = TokenPrefetcher::new(source.clone());
        let id = subject("u-1");

        prefetcher.trigger(&id, "link-a", request("u-1"));
        assert_eq!(prefetcher.token().await, None);
        assert_eq!(prefetcher.state(), PrefetchState::Failed);

        prefetcher.trigger(&id, "link-a", request("u-1"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls(), 1);

        // new inputs start a new attempt
        prefetcher.trigger(&subject("u-2"), "link-a", request("u-2"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_in_flight_reply() {
        let source = Arc::new(CountingSource::new(Duration::from_millis(200)));
        let prefetcher = TokenPrefetcher::new(source.clone());

        prefetcher.trigger(&subject("u-1"), "link-a", request("u-1"));
        prefetcher.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(prefetcher.state(), PrefetchState::Idle);
        assert_eq!(prefetcher.token().await, None);
    }

    #[tokio::test]
    async fn empty_link_never_fetches() {
        let source = Arc::new(CountingSource::new(Duration::ZERO));
        let prefetcher = TokenPrefetcher::new(source.clone());
        prefetcher.trigger(&subject("u-1"), "", request("u-1"));
        assert_eq!(prefetcher.state(), PrefetchState::Idle);
        assert_eq!(source.calls(), 0);
    }
}
