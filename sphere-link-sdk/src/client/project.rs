//! Project API client (redirect chooser → Sphere backend).

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::ClientError;
use crate::objects::RedirectLinks;

/// Production host of the Sphere backend.
pub const DEFAULT_BASE_URL: &str = "https://stratosphere-network-tendermint-production.up.railway.app";

/// Endpoint returning the redirect sets of a project.
pub const GET_REDIRECT_LINKS_PATH: &str = "/project/get-redirect-links";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct GetRedirectLinksRequest<'a> {
    project_api_key: &'a str,
}

/// Typed HTTP client for the Sphere **project API**.
///
/// Every call authenticates with the project API key in the JSON body.
#[derive(Clone)]
pub struct ProjectClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for ProjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProjectClient {
    /// Create a new `ProjectClient`.
    ///
    /// * `base_url` – root URL of the Sphere backend.
    /// * `api_key` – the project API key. A missing key is only reported
    ///   when a request is attempted.
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            http: build_http_client(DEFAULT_TIMEOUT),
            base_url,
            api_key,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Rebuild the HTTP client with a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_http_client(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /project/get-redirect-links` – fetch the request and send
    /// redirect sets configured for the project.
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_redirect_links(&self) -> Result<RedirectLinks, ClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                tracing::error!("project api key not configured");
                ClientError::MissingApiKey
            })?;

        let url = self.base_url.join(GET_REDIRECT_LINKS_PATH)?;
        tracing::debug!(%url, "requesting redirect links");

        let resp = self
            .http
            .post(url)
            .json(&GetRedirectLinksRequest {
                project_api_key: api_key,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "redirect link request failed");
                e
            })?;

        tracing::debug!(status = %resp.status(), "redirect link response received");
        let links = parse_response(resp).await.map_err(|e| {
            tracing::error!(error = %e, "unusable redirect link response");
            e
        })?;
        tracing::info!("redirect links loaded");
        Ok(links)
    }
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
