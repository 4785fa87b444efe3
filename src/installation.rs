//! Picks the installation a token is minted for

use thiserror::Error;
use tracing::info;

use crate::github::Installation;

/// Errors raised while choosing an installation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstallationError {
    /// The App is not installed anywhere
    #[error("No installations found for this GitHub App")]
    NoneFound,

    /// The configured installation id is not among the App's installations
    #[error("GH_APP_INSTALLATION_ID {id} not found. Available installation IDs: {available:?}")]
    NotFound { id: u64, available: Vec<u64> },
}

/// Selects the installation to use.
///
/// With an explicit id the matching entry is returned; otherwise the first
/// installation is used and all available ones are logged so operators can
/// pin the right one.
pub fn select_installation(
    installations: &[Installation],
    explicit_id: Option<u64>,
) -> Result<&Installation, InstallationError> {
    let first = installations.first().ok_or(InstallationError::NoneFound)?;

    let chosen = match explicit_id {
        Some(id) => installations
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| InstallationError::NotFound {
                id,
                available: installations.iter().map(|i| i.id).collect(),
            })?,
        None => {
            info!("Available installations: {}", describe(installations));
            first
        }
    };

    info!(
        "Using installation id {} (account {})",
        chosen.id,
        chosen.login()
    );
    Ok(chosen)
}

/// Formats installations as `id:login` pairs
fn describe(installations: &[Installation]) -> String {
    installations
        .iter()
        .map(|i| format!("{}:{}", i.id, i.login()))
        .collect::<Vec<_>>()
        .join(", ")
}
