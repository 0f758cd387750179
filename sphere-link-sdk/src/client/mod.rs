//! HTTP client for the Sphere project API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the link types do not pull in `reqwest`.

mod project;

pub use project::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GET_REDIRECT_LINKS_PATH, ProjectClient};

use reqwest::StatusCode;

/// Errors produced while fetching redirect links.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No project API key was configured.
    #[error("project api key not configured")]
    MissingApiKey,

    /// Transport-level failure (DNS, TLS, timeout, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Message shown to the user on the error screen.
    pub fn user_message(&self) -> &'static str {
        "Failed to load platform links. Please try again."
    }
}
