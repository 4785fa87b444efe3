//! GitHub REST API client for App endpoints
//!
//! Only the two endpoints needed to turn an App JWT into an installation
//! token are covered: listing installations and creating an access token.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// REST API version pinned on every request
const API_VERSION: &str = "2022-11-28";

/// Media type GitHub recommends for REST requests
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// GitHub refuses requests without a user agent
const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when talking to the GitHub API
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure or undecodable response body
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The JWT cannot be used as a header value
    #[error("JWT is not a valid header value")]
    InvalidJwt,
}

/// Account an installation belongs to
///
/// Enterprise installations carry `slug`/`name` instead of a `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub login: Option<String>,
}

/// A GitHub App installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub id: u64,
    #[serde(default)]
    pub account: Option<Account>,
}

impl Installation {
    /// Login of the owning account, or `unknown` when GitHub omits it
    pub fn login(&self) -> &str {
        self.account
            .as_ref()
            .and_then(|a| a.login.as_deref())
            .unwrap_or("unknown")
    }
}

/// Installation access token returned by GitHub
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub token: String,
    /// ISO-8601 expiry, kept verbatim
    pub expires_at: String,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client for the GitHub App endpoints
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    /// Base URL for the API (allows override for testing and GHES)
    base_url: String,
}

impl GitHubClient {
    /// Creates a client for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Lists the installations of the App identified by `jwt`
    pub async fn list_installations(&self, jwt: &str) -> Result<Vec<Installation>, GitHubError> {
        let url = format!("{}/app/installations", self.base_url);
        self.send(self.client.get(&url), &url, jwt).await
    }

    /// Creates an access token for one installation
    pub async fn create_access_token(
        &self,
        jwt: &str,
        installation_id: u64,
    ) -> Result<AccessToken, GitHubError> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.base_url, installation_id
        );
        self.send(self.client.post(&url), &url, jwt).await
    }

    /// Sends an authenticated request and decodes a successful JSON body
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
        jwt: &str,
    ) -> Result<T, GitHubError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", jwt))
            .map_err(|_| GitHubError::InvalidJwt)?;

        let response = request
            .header(AUTHORIZATION, bearer)
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, AGENT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
