//! Navigators used by the command line.
//!
//! `LauncherNavigator` hands URLs to an external opener such as `xdg-open`
//! and considers the page left once the opener exits successfully.
//! `PrintNavigator` writes URLs to stdout for the caller to follow.

use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use sphere_link_core::resolver::{NavigationError, Navigator};
use tokio::process::Command;
use tokio::sync::watch;

/// Resolves once `flag` is set. Pends forever if the sender is gone.
async fn wait_departed(flag: &watch::Sender<bool>) {
    let mut rx = flag.subscribe();
    if rx.wait_for(|departed| *departed).await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub struct LauncherNavigator {
    program: String,
    departed: Arc<watch::Sender<bool>>,
}

impl LauncherNavigator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            departed: Arc::new(watch::channel(false).0),
        }
    }
}

#[async_trait]
impl Navigator for LauncherNavigator {
    async fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        let mut child = Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| NavigationError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let departed = Arc::clone(&self.departed);
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::debug!(%program, "launcher accepted target");
                    departed.send_replace(true);
                }
                Ok(status) => tracing::warn!(%program, %status, "launcher could not open target"),
                Err(e) => tracing::warn!(%program, error = %e, "failed to wait for launcher"),
            }
        });
        Ok(())
    }

    async fn departed(&self) {
        wait_departed(&self.departed).await
    }
}

/// Writes each target to stdout on its own line.
pub struct PrintNavigator {
    departed: watch::Sender<bool>,
}

impl Default for PrintNavigator {
    fn default() -> Self {
        Self {
            departed: watch::channel(false).0,
        }
    }
}

#[async_trait]
impl Navigator for PrintNavigator {
    async fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{url}")?;
        stdout.flush()?;
        self.departed.send_replace(true);
        Ok(())
    }

    async fn departed(&self) {
        wait_departed(&self.departed).await
    }
}

/// Pick the navigator for the configured launcher.
pub fn from_launcher(launcher: Option<&str>) -> Arc<dyn Navigator> {
    match launcher {
        Some(program) => Arc::new(LauncherNavigator::new(program)),
        None => Arc::new(PrintNavigator::default()),
    }
}
