//! Top-level error type
//!
//! Every fatal failure of a run ends up here; `main` prints it and exits 1.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::github::GitHubError;
use crate::installation::InstallationError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Installation(#[from] InstallationError),
}

pub type Result<T> = std::result::Result<T, Error>;
