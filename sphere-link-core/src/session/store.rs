//! UI state and its single update channel.
//!
//! `StateStore` wraps a `watch` channel holding the current [`UiState`].
//! The only legal transitions are `Loading -> Ready` and
//! `Loading -> Failed`; everything else is rejected.

use sphere_link_sdk::{ParsedLink, RedirectLinks};
use thiserror::Error;
use tokio::sync::watch;

/// Where an initialization failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The `data` parameter was missing or unusable.
    Decode,
    /// The redirect sets could not be fetched.
    Fetch,
}

/// A fatal initialization error, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    /// User-facing message.
    pub message: &'static str,
    /// Underlying error, for logs.
    pub detail: String,
}

/// Data available once both decoding and fetching succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyState {
    pub link: Option<ParsedLink>,
    pub redirects: RedirectLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Loading,
    Ready(ReadyState),
    Failed(Failure),
}

impl UiState {
    pub const fn name(&self) -> &'static str {
        match self {
            UiState::Loading => "loading",
            UiState::Ready(_) => "ready",
            UiState::Failed(_) => "failed",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, UiState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal ui state transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Holder of the current [`UiState`].
///
/// Subscribers receive a `watch::Receiver` and observe the single settling
/// transition.
#[derive(Debug)]
pub struct StateStore {
    tx: watch::Sender<UiState>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create a store in the `Loading` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(UiState::Loading);
        Self { tx }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> UiState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    /// Move out of `Loading` into `next` and notify subscribers.
    pub fn transition(&self, next: UiState) -> Result<(), TransitionError> {
        let mut result = Ok(());
        self.tx.send_if_modified(|state| {
            if state.is_settled() || !next.is_settled() {
                result = Err(TransitionError {
                    from: state.name(),
                    to: next.name(),
                });
                return false;
            }
            tracing::debug!(from = state.name(), to = next.name(), "ui state transition");
            *state = next;
            true
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_link_sdk::RedirectSet;

    fn ready() -> UiState {
        UiState::Ready(ReadyState {
            link: None,
            redirects: RedirectLinks {
                request_redirect_link: RedirectSet::with_url("https://pay.example/r"),
                send_link_redirect: RedirectSet::with_url("https://pay.example/s"),
            },
        })
    }

    fn failed() -> UiState {
        UiState::Failed(Failure {
            kind: FailureKind::Fetch,
            message: "Failed to load platform links. Please try again.",
            detail: "timeout".to_string(),
        })
    }

    #[test]
    fn test_starts_loading() {
        assert_eq!(StateStore::new().current(), UiState::Loading);
    }

    #[test]
    fn test_loading_to_ready() {
        let store = StateStore::new();
        let rx = store.subscribe();
        store.transition(ready()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.current().name(), "ready");
    }

    #[test]
    fn test_settled_state_is_final() {
        let store = StateStore::new();
        store.transition(failed()).unwrap();
        let err = store.transition(ready()).unwrap_err();
        assert_eq!(
            err,
            TransitionError {
                from: "failed",
                to: "ready"
            }
        );
        assert_eq!(store.current(), failed());
    }

    #[test]
    fn test_cannot_return_to_loading() {
        let store = StateStore::new();
        let rx = store.subscribe();
        assert!(store.transition(UiState::Loading).is_err());
        assert!(!rx.has_changed().unwrap());
    }
}
