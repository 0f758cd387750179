//! Platform selection and navigation.
//!
//! The resolver composes the outbound URL for the chosen platform and hands
//! it to a [`Navigator`]. Mobile deep links get a grace period: if the
//! navigator has not reported leaving the page within
//! [`MOBILE_FALLBACK_DELAY`], the web URL for the same link is opened
//! instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sphere_link_sdk::{ParsedLink, Platform, PlatformUnavailable, RedirectLinks};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::session::ReadyState;

/// How long a mobile deep link may take before falling back to the web.
pub const MOBILE_FALLBACK_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write navigation target: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    PlatformUnavailable(#[from] PlatformUnavailable),
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),
}

impl ResolveError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::PlatformUnavailable(_) => "Platform URL not available",
            ResolveError::Navigation(_) => "Failed to open the selected platform.",
        }
    }
}

/// Performs navigation away from the page.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Start navigating to `url`. Returns once navigation was initiated.
    async fn navigate(&self, url: &str) -> Result<(), NavigationError>;

    /// Resolves once the page has been left. Must be cancel-safe; it is
    /// raced against the mobile fallback timer.
    async fn departed(&self);
}

#[async_trait]
impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    async fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        (**self).navigate(url).await
    }

    async fn departed(&self) {
        (**self).departed().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Telegram or web target opened.
    Navigated { url: String },
    /// The mobile target took over before the fallback fired.
    Departed { url: String },
    /// The mobile target did not take over; the web target was opened.
    FellBackToWeb { mobile_url: String, web_url: String },
    /// The mobile target did not take over and there is no web target.
    FallbackUnavailable { mobile_url: String },
}

pub struct Resolver<N> {
    link: ParsedLink,
    redirects: RedirectLinks,
    navigator: N,
    fallback_delay: Duration,
}

impl<N: Navigator> Resolver<N> {
    pub fn new(link: ParsedLink, redirects: RedirectLinks, navigator: N) -> Self {
        Self {
            link,
            redirects,
            navigator,
            fallback_delay: MOBILE_FALLBACK_DELAY,
        }
    }

    /// Build a resolver for a settled page. `None` when there is no link
    /// to forward.
    pub fn from_ready(ready: &ReadyState, navigator: N) -> Option<Self> {
        let link = ready.link.clone()?;
        Some(Self::new(link, ready.redirects.clone(), navigator))
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn link(&self) -> &ParsedLink {
        &self.link
    }

    pub fn url_for(&self, platform: Platform) -> Result<String, PlatformUnavailable> {
        self.redirects.build_url(platform, &self.link)
    }

    pub fn is_available(&self, platform: Platform) -> bool {
        self.redirects.is_available(platform, self.link.kind)
    }

    /// Navigate to `platform`.
    ///
    /// Unavailable platforms are reported without navigating.
    pub async fn select(&self, platform: Platform) -> Result<NavigationOutcome, ResolveError> {
        let url = self.url_for(platform).map_err(|e| {
            warn!(%platform, "platform url not available");
            e
        })?;

        info!(%platform, %url, "redirecting");
        self.navigator.navigate(&url).await?;

        if platform != Platform::Mobile {
            return Ok(NavigationOutcome::Navigated { url });
        }

        tokio::select! {
            _ = self.navigator.departed() => {
                debug!("mobile target took over");
                Ok(NavigationOutcome::Departed { url })
            }
            _ = tokio::time::sleep(self.fallback_delay) => {
                let Ok(web_url) = self.url_for(Platform::Web) else {
                    warn!("mobile target did not open and no web fallback exists");
                    return Ok(NavigationOutcome::FallbackUnavailable { mobile_url: url });
                };
                info!(%web_url, "mobile target did not open, falling back to web");
                self.navigator.navigate(&web_url).await?;
                Ok(NavigationOutcome::FellBackToWeb { mobile_url: url, web_url })
            }
        }
    }
}
