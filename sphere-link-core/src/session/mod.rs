//! Page session: decode the link, fetch redirect sets, settle the UI state.

mod store;

pub use store::{Failure, FailureKind, ReadyState, StateStore, TransitionError, UiState};

use async_trait::async_trait;
use sphere_link_sdk::client::{ClientError, ProjectClient};
use sphere_link_sdk::{DecodeError, RedirectLinks, decode_page_url};
use tracing::{info, warn};

/// Source of the platform redirect sets.
#[async_trait]
pub trait RedirectSource: Send + Sync {
    async fn fetch_redirect_links(&self) -> Result<RedirectLinks, ClientError>;
}

#[async_trait]
impl RedirectSource for ProjectClient {
    async fn fetch_redirect_links(&self) -> Result<RedirectLinks, ClientError> {
        self.get_redirect_links().await
    }
}

impl Failure {
    pub fn from_decode(err: &DecodeError) -> Self {
        Self {
            kind: FailureKind::Decode,
            message: err.user_message(),
            detail: err.to_string(),
        }
    }

    pub fn from_fetch(err: &ClientError) -> Self {
        Self {
            kind: FailureKind::Fetch,
            message: err.user_message(),
            detail: err.to_string(),
        }
    }
}

/// One page load.
#[derive(Debug, Default)]
pub struct Session {
    store: StateStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Run the decoder and the redirect fetch, then settle into `Ready` or
    /// `Failed`.
    ///
    /// Decoding is pure and runs first; when it fails the fetch is skipped,
    /// since nothing could be rendered from its result.
    pub async fn initialize<S>(&self, page_url: &str, source: &S) -> Result<UiState, TransitionError>
    where
        S: RedirectSource + ?Sized,
    {
        let next = match decode_page_url(page_url) {
            Err(e) => {
                warn!(error = %e, "failed to decode link parameter");
                UiState::Failed(Failure::from_decode(&e))
            }
            Ok(link) => {
                info!(kind = %link.kind, id = %link.payload.id, "link decoded");
                match source.fetch_redirect_links().await {
                    Ok(redirects) => UiState::Ready(ReadyState {
                        link: Some(link),
                        redirects,
                    }),
                    Err(e) => {
                        warn!(error = %e, "failed to load platform links");
                        UiState::Failed(Failure::from_fetch(&e))
                    }
                }
            }
        };
        self.store.transition(next)?;
        Ok(self.store.current())
    }
}
