//! Installation token pipeline
//!
//! Serves a cached token when it is still fresh, otherwise signs an App JWT,
//! resolves the installation, mints a new token and caches it.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::AppSigner;
use crate::cache::{CachedToken, FileCache, NoCache, TokenCache};
use crate::config::Config;
use crate::error::Result;
use crate::github::{AccessToken, GitHubClient};
use crate::installation::select_installation;

/// Builds the cache a config asks for
pub fn cache_for(config: &Config) -> Box<dyn TokenCache> {
    match &config.cache_file {
        Some(path) => Box::new(FileCache::new(path.clone())),
        None => Box::new(NoCache),
    }
}

/// Returns a usable installation token.
///
/// # Behavior
/// - Returns the cached token if it has more than five minutes left
/// - Otherwise mints a new token and overwrites the cache
/// - A failed cache write is logged and does not fail the run
pub async fn get_token(
    config: &Config,
    client: &GitHubClient,
    cache: &dyn TokenCache,
) -> Result<String> {
    if let Some(token) = cached_token(cache, Utc::now()) {
        return Ok(token);
    }

    info!("Generating new GitHub App token");
    let access = generate_installation_token(config, client).await?;

    match cache.store(&CachedToken::new(&access.token, &access.expires_at)) {
        Ok(()) => info!("Token cached successfully"),
        Err(e) => warn!("Failed to cache token: {}", e),
    }

    Ok(access.token)
}

/// Looks up a token that is still fresh at `now`
pub fn cached_token(cache: &dyn TokenCache, now: DateTime<Utc>) -> Option<String> {
    let entry = cache.load()?;

    if entry.is_fresh(now) {
        let minutes = entry
            .remaining(now)
            .map(|left| left.num_minutes())
            .unwrap_or_default();
        info!("Using cached token (expires in {} minutes)", minutes);
        Some(entry.token)
    } else {
        info!("Cached token expired or expiring soon, generating new token");
        None
    }
}

/// Mints a new installation token without touching the cache
pub async fn generate_installation_token(
    config: &Config,
    client: &GitHubClient,
) -> Result<AccessToken> {
    let signer = AppSigner::from_credentials(config.credentials()?)?;
    let jwt = signer.sign()?;

    let installations = client.list_installations(&jwt).await?;
    let installation = select_installation(&installations, config.installation_id)?;

    Ok(client.create_access_token(&jwt, installation.id).await?)
}
