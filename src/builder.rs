//! Runtime policy selection for bounded caches.
//!
//! [`BoundedCache`](crate::policy::bounded::BoundedCache) picks its policy at
//! compile time. When the policy comes from configuration instead, build a
//! [`Cache`] through [`CacheBuilder`]; it exposes the same surface and
//! dispatches to the selected policy.
//!
//! ## Example
//!
//! ```rust
//! use ordcache::builder::{CacheBuilder, EvictionPolicy};
//!
//! let mut cache = CacheBuilder::new(100)
//!     .ratio(0.75)
//!     .build::<u64, String>(EvictionPolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! assert_eq!(cache.policy(), EvictionPolicy::Lru);
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::ds::ordered_map::{Cursor, Iter, Keys, OrderedMap, Values};
use crate::error::{ConfigError, MapError};
use crate::policy::bounded::DEFAULT_RATIO;
use crate::policy::lru::LruCache;
use crate::policy::mru::MruCache;
use crate::traits::{BoundedMap, CoreMap, ReadOnlyMap};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionPolicy {
    /// Evict the least recently used entries.
    Lru,
    /// Evict the most recently used entries.
    Mru,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => f.write_str("lru"),
            EvictionPolicy::Mru => f.write_str("mru"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "mru" => Ok(EvictionPolicy::Mru),
            other => Err(ConfigError::new(format!(
                "unknown eviction policy {other:?} (expected \"lru\" or \"mru\")"
            ))),
        }
    }
}

/// Bounded cache whose policy was chosen at runtime.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Mru(MruCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn policy(&self) -> EvictionPolicy {
        match &self.inner {
            CacheInner::Lru(_) => EvictionPolicy::Lru,
            CacheInner::Mru(_) => EvictionPolicy::Mru,
        }
    }

    /// Insert a key-value pair. Returns the previous value if the key existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Mru(mru) => mru.insert(key, value),
        }
    }

    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.insert(key, value);
        self
    }

    /// Get a value, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Mru(mru) => mru.get(key),
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get_mut(key),
            CacheInner::Mru(mru) => mru.get_mut(key),
        }
    }

    /// Get a value without touching it.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.as_map().get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.as_map().contains(key)
    }

    pub fn len(&self) -> usize {
        self.as_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limit(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.limit(),
            CacheInner::Mru(mru) => mru.limit(),
        }
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        match &mut self.inner {
            CacheInner::Lru(lru) => {
                lru.set_limit(limit);
            },
            CacheInner::Mru(mru) => {
                mru.set_limit(limit);
            },
        }
        self
    }

    pub fn ratio(&self) -> f64 {
        match &self.inner {
            CacheInner::Lru(lru) => lru.ratio(),
            CacheInner::Mru(mru) => mru.ratio(),
        }
    }

    pub fn set_ratio(&mut self, ratio: f64) -> &mut Self {
        match &mut self.inner {
            CacheInner::Lru(lru) => {
                lru.set_ratio(ratio);
            },
            CacheInner::Mru(mru) => {
                mru.set_ratio(ratio);
            },
        }
        self
    }

    pub fn check_trim(&mut self) -> usize {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.check_trim(),
            CacheInner::Mru(mru) => mru.check_trim(),
        }
    }

    pub fn delete(&mut self, key: &K) -> bool {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.delete(key),
            CacheInner::Mru(mru) => mru.delete(key),
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Mru(mru) => mru.remove(key),
        }
    }

    pub fn shift(&mut self) -> Result<Option<(K, V)>, MapError> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.shift(),
            CacheInner::Mru(mru) => mru.shift(),
        }
    }

    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Mru(mru) => mru.clear(),
        }
    }

    /// Recency-ordered entries, least recent first.
    pub fn as_map(&self) -> &OrderedMap<K, V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.as_map(),
            CacheInner::Mru(mru) => mru.as_map(),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.as_map().iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.as_map().keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.as_map().values()
    }

    pub fn for_each(&self, f: impl FnMut(&K, &V)) {
        self.as_map().for_each(f);
    }

    pub fn cursor(&self) -> Cursor {
        self.as_map().cursor()
    }

    pub fn to_entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.as_map().to_entries()
    }

    pub fn load_entries<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.load_entries(pairs),
            CacheInner::Mru(mru) => mru.load_entries(pairs),
        }
    }
}

impl<K, V> Clone for Cache<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            CacheInner::Lru(lru) => CacheInner::Lru(lru.clone()),
            CacheInner::Mru(mru) => CacheInner::Mru(mru.clone()),
        };
        Self { inner }
    }
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => fmt::Debug::fmt(lru, f),
            CacheInner::Mru(mru) => fmt::Debug::fmt(mru, f),
        }
    }
}

impl<K: Clone + Eq + Hash, V> ReadOnlyMap<K, V> for Cache<K, V> {
    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        Cache::peek(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }
}

impl<K: Clone + Eq + Hash, V> CoreMap<K, V> for Cache<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Cache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        Cache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Cache::remove(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        Cache::delete(self, key)
    }

    fn clear(&mut self) {
        Cache::clear(self);
    }
}

impl<K: Clone + Eq + Hash, V> BoundedMap<K, V> for Cache<K, V> {
    fn limit(&self) -> usize {
        Cache::limit(self)
    }

    fn set_limit(&mut self, limit: usize) {
        Cache::set_limit(self, limit);
    }

    fn ratio(&self) -> f64 {
        Cache::ratio(self)
    }

    fn set_ratio(&mut self, ratio: f64) {
        Cache::set_ratio(self, ratio);
    }
}

/// Builder for [`Cache`] instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    limit: usize,
    ratio: f64,
}

impl CacheBuilder {
    /// Create a builder for caches holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ratio: DEFAULT_RATIO,
        }
    }

    /// Fraction of `limit` kept after an overflow trim.
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Build a cache with the specified policy; an out-of-range ratio is
    /// clamped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ordcache::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// let cache = CacheBuilder::new(10).ratio(2.0).build::<u64, u64>(EvictionPolicy::Mru);
    /// assert_eq!(cache.ratio(), 1.0);
    /// ```
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Clone + Eq + Hash,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCache::new(self.limit, self.ratio)),
            EvictionPolicy::Mru => CacheInner::Mru(MruCache::new(self.limit, self.ratio)),
        };
        Cache { inner }
    }

    /// Like [`build`](Self::build) but rejects a ratio outside `[0, 1]`.
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCache::try_new(self.limit, self.ratio)?),
            EvictionPolicy::Mru => CacheInner::Mru(MruCache::try_new(self.limit, self.ratio)?),
        };
        Ok(Cache { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [EvictionPolicy; 2] = [EvictionPolicy::Lru, EvictionPolicy::Mru];

    #[test]
    fn test_all_policies_basic_ops() {
        for policy in POLICIES {
            let mut cache = CacheBuilder::new(10).build::<u64, String>(policy);
            assert_eq!(cache.policy(), policy);

            // Insert
            assert_eq!(cache.insert(1, "one".to_string()), None);
            assert_eq!(cache.insert(2, "two".to_string()), None);

            // Get
            assert_eq!(cache.get(&1), Some(&"one".to_string()));
            assert_eq!(cache.get(&2), Some(&"two".to_string()));
            assert_eq!(cache.get(&3), None);

            // Contains
            assert!(cache.contains(&1));
            assert!(!cache.contains(&99));

            // Len
            assert_eq!(cache.len(), 2);
            assert!(!cache.is_empty());

            // Update
            assert_eq!(cache.insert(1, "ONE".to_string()), Some("one".to_string()));
            assert_eq!(cache.peek(&1), Some(&"ONE".to_string()));

            // Clear
            cache.clear();
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn test_limit_enforcement_lru() {
        let mut cache = CacheBuilder::new(2).build::<u64, &str>(EvictionPolicy::Lru);

        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.insert(3, "three"); // Evicts key 1

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn test_limit_enforcement_mru() {
        let mut cache = CacheBuilder::new(2).build::<u64, &str>(EvictionPolicy::Mru);

        cache.set(1, "one").set(2, "two").set(3, "three"); // Evicts key 2

        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_try_build_rejects_ratio() {
        for policy in POLICIES {
            let err = CacheBuilder::new(4)
                .ratio(-0.5)
                .try_build::<u8, u8>(policy)
                .unwrap_err();
            assert!(err.message().contains("ratio"));
            assert!(CacheBuilder::new(4).ratio(0.5).try_build::<u8, u8>(policy).is_ok());
        }
    }

    #[test]
    fn test_reconfigure_at_runtime() {
        let mut cache = CacheBuilder::new(6).build::<u32, u32>(EvictionPolicy::Lru);
        for i in 0..6 {
            cache.insert(i, i);
        }
        cache.set_ratio(0.5).set_limit(4);
        assert_eq!(cache.limit(), 4);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(cache.check_trim(), 0);
    }

    #[test]
    fn test_entries_and_cursor() {
        let mut cache = CacheBuilder::new(4).build::<&str, i32>(EvictionPolicy::Mru);
        cache.load_entries([("a", 1), ("b", 2)]);
        assert_eq!(cache.to_entries(), vec![("a", 1), ("b", 2)]);
        assert_eq!(cache.shift().unwrap(), Some(("a", 1)));

        let mut cursor = cache.cursor();
        assert_eq!(cursor.next(cache.as_map()).unwrap(), Some((&"b", &2)));
        assert_eq!(cursor.next(cache.as_map()).unwrap(), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("LRU".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!("mru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Mru);
        assert!("fifo".parse::<EvictionPolicy>().is_err());
        assert_eq!(EvictionPolicy::Mru.to_string(), "mru");
    }
}
