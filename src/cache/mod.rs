//! Token cache
//!
//! Installation tokens live for an hour, so a run that finds a cached token
//! with enough lifetime left skips signing and both API calls. The cache is an
//! injected [`TokenCache`] so the pipeline can run against a file, nothing, or
//! a test double.

mod file;

pub use file::FileCache;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Safety margin subtracted from a token's expiry, in seconds
pub const EXPIRATION_BUFFER_SECS: i64 = 300;

/// Token entry as persisted on disk
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Installation access token
    pub token: String,
    /// Expiry reported by GitHub (ISO-8601)
    pub expires_at: String,
    /// When the entry was written (RFC 3339, UTC)
    pub cached_at: String,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("cached_at", &self.cached_at)
            .finish()
    }
}

impl CachedToken {
    /// Creates an entry stamped with the current time
    pub fn new(token: impl Into<String>, expires_at: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: expires_at.into(),
            cached_at: Utc::now().to_rfc3339(),
        }
    }

    /// Parsed expiry, `None` if the stored timestamp is not ISO-8601
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Lifetime left at `now`, `None` if the expiry cannot be parsed
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at().map(|expires| expires - now)
    }

    /// Whether the token can still be handed out at `now`.
    ///
    /// An entry is fresh only with a non-empty token and more than
    /// [`EXPIRATION_BUFFER_SECS`] of lifetime left.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty()
            && self
                .remaining(now)
                .is_some_and(|left| left > Duration::seconds(EXPIRATION_BUFFER_SECS))
    }
}

/// Storage for the last minted token
pub trait TokenCache {
    /// Returns the stored entry; unreadable or corrupt storage is `None`
    fn load(&self) -> Option<CachedToken>;

    /// Replaces the stored entry
    fn store(&self, entry: &CachedToken) -> std::io::Result<()>;
}

/// Cache that never holds anything, used with `--no-cache`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl TokenCache for NoCache {
    fn load(&self) -> Option<CachedToken> {
        None
    }

    fn store(&self, _entry: &CachedToken) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(expires_at: &str) -> CachedToken {
        CachedToken {
            token: "ghs_cached".to_string(),
            expires_at: expires_at.to_string(),
            cached_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_when_more_than_buffer_left() {
        // 5 minutes and 1 second left
        assert!(entry("2024-01-01T12:05:01Z").is_fresh(noon()));
        assert!(entry("2024-01-01T13:00:00Z").is_fresh(noon()));
    }

    #[test]
    fn test_stale_at_exactly_the_buffer() {
        assert!(!entry("2024-01-01T12:05:00Z").is_fresh(noon()));
    }

    #[test]
    fn test_stale_within_buffer_or_expired() {
        assert!(!entry("2024-01-01T12:04:59Z").is_fresh(noon()));
        assert!(!entry("2024-01-01T11:00:00Z").is_fresh(noon()));
    }

    #[test]
    fn test_offset_timestamps_are_normalised() {
        // 13:00+01:00 is noon UTC, so no lifetime left
        assert!(!entry("2024-01-01T13:00:00+01:00").is_fresh(noon()));
        assert_eq!(
            entry("2024-01-01T13:00:00+01:00").remaining(noon()),
            Some(Duration::zero())
        );
    }

    #[test]
    fn test_unparseable_expiry_is_stale() {
        let cached = entry("next tuesday");
        assert!(cached.expires_at().is_none());
        assert!(cached.remaining(noon()).is_none());
        assert!(!cached.is_fresh(noon()));
    }

    #[test]
    fn test_empty_token_is_stale() {
        let mut cached = entry("2099-01-01T00:00:00Z");
        cached.token.clear();
        assert!(!cached.is_fresh(noon()));
    }

    #[test]
    fn test_new_stamps_cached_at() {
        let before = Utc::now();
        let cached = CachedToken::new("ghs_new", "2099-01-01T00:00:00Z");
        let cached_at = DateTime::parse_from_rfc3339(&cached.cached_at)
            .unwrap()
            .with_timezone(&Utc);

        assert!(cached_at >= before - Duration::seconds(1));
        assert_eq!(cached.token, "ghs_new");
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", entry("2099-01-01T00:00:00Z"));
        assert!(!debug.contains("ghs_cached"));
    }

    #[test]
    fn test_no_cache_is_always_empty() {
        let cache = NoCache;
        cache.store(&entry("2099-01-01T00:00:00Z")).unwrap();
        assert!(cache.load().is_none());
    }
}
