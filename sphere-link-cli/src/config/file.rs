//! TOML file configuration structures.
//!
//! These structs directly map to the `sphere-link.toml` file format. Every
//! section is optional; a missing file behaves like an empty one.

use serde::{Deserialize, Serialize};
use sphere_link_sdk::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Backend section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Root URL of the Sphere backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Project API key. Usually supplied through the environment instead.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Navigation section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Program that opens URLs (e.g. `xdg-open`). Without one, targets are
    /// printed to stdout.
    #[serde(default)]
    pub launcher: Option<String>,
    /// Grace period before a mobile deep link falls back to the web URL.
    #[serde(default = "default_mobile_fallback_ms")]
    pub mobile_fallback_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            launcher: None,
            mobile_fallback_ms: default_mobile_fallback_ms(),
        }
    }
}

fn default_mobile_fallback_ms() -> u64 {
    sphere_link_core::resolver::MOBILE_FALLBACK_DELAY.as_millis() as u64
}
