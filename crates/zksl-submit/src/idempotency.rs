//! In-memory idempotency cache backing `Idempotency-Key`-guarded endpoints.
//! A hand-rolled `HashMap` plus an ordered key list for LRU eviction, in the
//! same spirit as a plain bookkeeping structure with no external crate.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Clone, Debug)]
pub struct CachedResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

struct Entry {
    inserted_at: Instant,
    response: CachedResponse,
}

/// TTL'd, capacity-bounded cache from idempotency key to the response that
/// was returned the first time that key was seen.
pub struct IdempotencyCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, Entry>,
    /// Oldest-first insertion order, used purely for LRU eviction once
    /// `max_entries` is exceeded; not touched on lookup (insertion-order
    /// eviction, not access-order).
    order: VecDeque<String>,
}

impl IdempotencyCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn with_ttl(max_entries: usize, ttl: Duration) -> Self {
        let mut cache = Self::new(max_entries);
        cache.ttl = ttl;
        cache
    }

    /// Returns the cached response for `key` if present and not expired.
    /// Lazily evicts the entry if it has expired.
    pub fn get(&mut self, key: &str) -> Option<CachedResponse> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            self.order.retain(|k| k != key);
            return None;
        }
        self.entries.get(key).map(|e| e.response.clone())
    }

    /// Record the response for `key`, evicting the oldest entry first if at
    /// capacity. A repeated insert for a key already present overwrites it
    /// without changing its eviction order.
    pub fn put(&mut self, key: String, response: CachedResponse) {
        if !self.entries.contains_key(&key) {
            if self.entries.len() >= self.max_entries {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key.clone());
        }
        self.entries.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                response,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for IdempotencyCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> CachedResponse {
        CachedResponse {
            status,
            body: serde_json::json!({ "status": status }),
        }
    }

    #[test]
    fn repeated_put_returns_identical_response() {
        let mut cache = IdempotencyCache::new(10);
        cache.put("key-1".into(), response(200));
        let first = cache.get("key-1").unwrap();
        let second = cache.get("key-1").unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.body, second.body);
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let mut cache = IdempotencyCache::with_ttl(10, Duration::from_millis(1));
        cache.put("key-1".into(), response(200));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("key-1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_overflow_evicts_oldest_entry() {
        let mut cache = IdempotencyCache::new(2);
        cache.put("a".into(), response(200));
        cache.put("b".into(), response(200));
        cache.put("c".into(), response(200));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }
}
