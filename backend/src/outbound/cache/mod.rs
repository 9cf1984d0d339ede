//! In-process whole-page cache.
//!
//! Entries live behind a single mutex and expire on a fixed TTL checked
//! at read time. Suits one process; a multi-node deployment would swap in
//! a shared backend behind the same port.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{CacheError, PageCache};

struct Entry {
    body: String,
    expires_at: Instant,
}

/// [`PageCache`] backed by an in-process map with per-entry expiry.
pub struct MemoryPageCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryPageCache {
    /// Create a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::backend("page cache lock poisoned"))
    }
}

#[async_trait]
impl PageCache for MemoryPageCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.body.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, body: &str) -> Result<(), CacheError> {
        let entry = Entry {
            body: body.to_owned(),
            expires_at: Instant::now() + self.ttl,
        };
        self.lock()?.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_returns_within_ttl() {
        let cache = MemoryPageCache::new(Duration::from_secs(60));
        cache.put("/", "<html>feed</html>").await.expect("put");
        let hit = cache.get("/").await.expect("get");
        assert_eq!(hit.as_deref(), Some("<html>feed</html>"));
    }

    #[tokio::test]
    async fn expired_entries_miss() {
        let cache = MemoryPageCache::new(Duration::ZERO);
        cache.put("/", "stale").await.expect("put");
        assert_eq!(cache.get("/").await.expect("get"), None);
    }

    #[tokio::test]
    async fn invalidate_clears_one_key() {
        let cache = MemoryPageCache::new(Duration::from_secs(60));
        cache.put("/", "a").await.expect("put");
        cache.put("/?page=2", "b").await.expect("put");
        cache.invalidate("/").await.expect("invalidate");
        assert_eq!(cache.get("/").await.expect("get"), None);
        assert_eq!(cache.get("/?page=2").await.expect("get").as_deref(), Some("b"));
    }
}
