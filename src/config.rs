//! Runtime configuration
//!
//! Builds the immutable [`Config`] from parsed CLI arguments once at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::Cli;

/// File name of the token cache inside the temporary directory
pub const CACHE_FILE_NAME: &str = "gh_app_token_cache.json";

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is absent or empty
    #[error("Missing GH_APP_ID or GH_APP_PRIVATE_KEY_PEM_B64")]
    MissingCredentials,
}

/// GitHub App credentials
#[derive(Clone)]
pub struct Credentials {
    /// App identifier, used as the JWT issuer
    pub app_id: String,
    /// Base64-encoded PEM private key, as provided by the operator
    pub private_key_b64: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("private_key_b64", &"<redacted>")
            .finish()
    }
}

/// Everything a single run needs
#[derive(Debug, Clone)]
pub struct Config {
    /// App credentials, `None` when either value is absent or empty
    credentials: Option<Credentials>,
    /// Explicit installation to use instead of the first one
    pub installation_id: Option<u64>,
    /// GitHub REST API base URL, without trailing slash
    pub api_url: String,
    /// Cache file location, `None` when caching is disabled
    pub cache_file: Option<PathBuf>,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// Credentials are validated lazily through [`Config::credentials`], so a
    /// cached token can be served without them.
    pub fn from_cli(cli: &Cli) -> Self {
        let credentials = match (
            non_empty(cli.app_id.as_deref()),
            non_empty(cli.private_key_b64.as_deref()),
        ) {
            (Some(app_id), Some(private_key_b64)) => Some(Credentials {
                app_id,
                private_key_b64,
            }),
            _ => None,
        };

        let cache_file = if cli.no_cache {
            None
        } else {
            Some(cli.cache_file.clone().unwrap_or_else(default_cache_file))
        };

        Config {
            credentials,
            installation_id: cli.installation_id,
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            cache_file,
        }
    }

    /// Creates a Config with no credentials and caching disabled
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Config {
            credentials: None,
            installation_id: None,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache_file: None,
        }
    }

    /// Sets the App credentials
    pub fn with_credentials(
        mut self,
        app_id: impl Into<String>,
        private_key_b64: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            app_id: app_id.into(),
            private_key_b64: private_key_b64.into(),
        });
        self
    }

    /// Pins the installation to mint a token for
    pub fn with_installation_id(mut self, installation_id: u64) -> Self {
        self.installation_id = Some(installation_id);
        self
    }

    /// Enables caching at the given path
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Returns the App credentials.
    ///
    /// # Returns
    /// * `Ok(&Credentials)` when both values were present and non-empty
    /// * `Err(ConfigError::MissingCredentials)` otherwise
    pub fn credentials(&self) -> Result<&Credentials, ConfigError> {
        self.credentials
            .as_ref()
            .ok_or(ConfigError::MissingCredentials)
    }
}

/// Default cache location in the shared temporary directory
pub fn default_cache_file() -> PathBuf {
    std::env::temp_dir().join(CACHE_FILE_NAME)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
