//! Configuration module for sphere-link.
//!
//! Handles loading configuration from a TOML file, environment variables,
//! CLI arguments, and the API key baked in at build time.

pub mod file;

use crate::config::file::FileConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the project API key.
pub const API_KEY_ENV: &str = "SPHERE_PROJECT_API_KEY";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SPHERE_API_BASE_URL";

/// API key embedded when the binary was built, if any.
const BUILD_API_KEY: Option<&str> = option_env!("SPHERE_PROJECT_API_KEY");

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid backend url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values passed on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub timeout: Duration,
    /// `None` is not an error here; the fetch step reports it.
    pub api_key: Option<String>,
    pub launcher: Option<String>,
    pub mobile_fallback_delay: Duration,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load settings using the process environment.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file yields defaults)
    /// 2. Apply environment overrides
    /// 3. Apply CLI overrides
    /// 4. Fall back to the build-time API key
    /// 5. Validate and build the settings
    pub fn load_with_env<F>(&self, env: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut file_config = self.read_file()?;

        if let Some(key) = env(API_KEY_ENV) {
            file_config.backend.api_key = Some(key);
        }
        if let Some(base_url) = env(BASE_URL_ENV) {
            file_config.backend.base_url = base_url;
        }

        if let Some(key) = &self.overrides.api_key {
            file_config.backend.api_key = Some(key.clone());
        }
        if let Some(base_url) = &self.overrides.base_url {
            file_config.backend.base_url = base_url.clone();
        }

        let api_key = file_config
            .backend
            .api_key
            .take()
            .filter(|k| !k.is_empty())
            .or_else(|| BUILD_API_KEY.filter(|k| !k.is_empty()).map(str::to_string));
        if api_key.is_none() {
            tracing::warn!("no project api key configured; platform links cannot be loaded");
        }

        self.build_settings(file_config, api_key)
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => {
                tracing::debug!(path = ?self.config_path, "configuration file loaded");
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.config_path, "no configuration file, using defaults");
                Ok(FileConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn build_settings(
        &self,
        file_config: FileConfig,
        api_key: Option<String>,
    ) -> Result<Settings, ConfigError> {
        let base_url = Url::parse(&file_config.backend.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "backend url must use http or https, got {}",
                base_url.scheme()
            )));
        }
        if file_config.backend.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Settings {
            base_url,
            timeout: Duration::from_secs(file_config.backend.timeout_secs),
            api_key,
            launcher: file_config.navigation.launcher.filter(|l| !l.is_empty()),
            mobile_fallback_delay: Duration::from_millis(file_config.navigation.mobile_fallback_ms),
        })
    }
}
