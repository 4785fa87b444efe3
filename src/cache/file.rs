//! File-backed token cache
//!
//! Stores a single [`CachedToken`] as a JSON file. Anything that prevents
//! reading it back is reported as a miss.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use super::{CachedToken, TokenCache};

/// Reads and writes the cached token at a fixed path
#[derive(Debug, Clone)]
pub struct FileCache {
    /// Location of the JSON file
    path: PathBuf,
}

impl FileCache {
    /// Creates a cache backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenCache for FileCache {
    fn load(&self) -> Option<CachedToken> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No cached token at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<CachedToken>(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                info!("Error reading cache: {}, generating new token", e);
                None
            }
        }
    }

    fn store(&self, entry: &CachedToken) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // The file holds a live credential: owner-only before any byte lands
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(json.as_bytes())?;
        file.flush()
    }
}
