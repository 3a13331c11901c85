use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Storage for a signed provider token, letting a host reuse one token
/// across many sends instead of signing per request.
///
/// Implementations own their synchronization; `get` and `set` may race
/// when a host shares the provider between threads, and the worst case of
/// losing that race is one redundant signature.
pub trait TokenCache: Send + Sync {
    /// The cached token, or `None` when absent or no longer usable.
    fn get(&self) -> Option<String>;

    /// Stores a freshly signed token.
    fn set(&self, token: &str);
}

/// The default cache: remembers nothing, so every send signs a new token.
pub struct NoCache;

impl TokenCache for NoCache {
    fn get(&self) -> Option<String> {
        None
    }

    fn set(&self, _token: &str) {}
}

/// A single-slot in-memory cache with a time-to-live.
///
/// APNs accepts a provider token for up to 60 minutes after its issue
/// time; the default TTL of 55 minutes refreshes ahead of that deadline.
pub struct MemoryTokenCache {
    slot: Mutex<Option<CachedToken>>,
    ttl: Duration,
}

struct CachedToken {
    token: String,
    signed_at: Instant,
}

impl MemoryTokenCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(55 * 60);

    pub fn new(ttl: Duration) -> MemoryTokenCache {
        MemoryTokenCache {
            slot: Mutex::new(None),
            ttl,
        }
    }
}

impl Default for MemoryTokenCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self) -> Option<String> {
        let slot = self.slot.lock().ok()?;

        slot.as_ref()
            .filter(|cached| cached.signed_at.elapsed() < self.ttl)
            .map(|cached| cached.token.clone())
    }

    fn set(&self, token: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(CachedToken {
                token: token.to_string(),
                signed_at: Instant::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cache_forgets_everything() {
        let cache = NoCache;
        cache.set("token");

        assert_eq!(None, cache.get());
    }

    #[test]
    fn memory_cache_returns_the_token_within_its_ttl() {
        let cache = MemoryTokenCache::default();
        cache.set("token");

        assert_eq!(Some("token".to_string()), cache.get());
    }

    #[test]
    fn memory_cache_expires_the_token_after_its_ttl() {
        let cache = MemoryTokenCache::new(Duration::from_secs(0));
        cache.set("token");

        assert_eq!(None, cache.get());
    }

    #[test]
    fn memory_cache_replaces_rather_than_updates() {
        let cache = MemoryTokenCache::default();
        cache.set("first");
        cache.set("second");

        assert_eq!(Some("second".to_string()), cache.get());
    }
}
