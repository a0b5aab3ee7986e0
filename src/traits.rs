//! # Map Trait Hierarchy
//!
//! Uniform contract shared by every structure in the crate, so callers can be
//! generic over "some keyed store" without caring whether it is insertion
//! ordered, recency bounded or sorted.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────────────────────┐
//!                    │          ReadOnlyMap<K, V>          │
//!                    │                                     │
//!                    │  contains(&, &K) → bool             │
//!                    │  peek(&, &K) → Option<&V>           │
//!                    │  len(&) → usize                     │
//!                    │  is_empty(&) → bool                 │
//!                    └──────────────────┬──────────────────┘
//!                                       │
//!                                       ▼
//!                    ┌─────────────────────────────────────┐
//!                    │            CoreMap<K, V>            │
//!                    │                                     │
//!                    │  insert(&mut, K, V) → Option<V>     │
//!                    │  get(&mut, &K) → Option<&V>         │
//!                    │  remove(&mut, &K) → Option<V>       │
//!                    │  delete(&mut, &K) → bool            │
//!                    │  clear(&mut)                        │
//!                    └──────────────────┬──────────────────┘
//!                                       │
//!                                       ▼
//!                    ┌─────────────────────────────────────┐
//!                    │           BoundedMap<K, V>          │
//!                    │                                     │
//!                    │  limit(&) → usize                   │
//!                    │  set_limit(&mut, usize)             │
//!                    │  ratio(&) → f64                     │
//!                    │  set_ratio(&mut, f64)               │
//!                    └─────────────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Type               | ReadOnlyMap | CoreMap | BoundedMap | `get` touches  |
//! |--------------------|-------------|---------|------------|----------------|
//! | `OrderedMap`       | ✅          | ✅      | ❌         | no             |
//! | `BoundedCache<P>`  | ✅          | ✅      | ✅         | yes (AsNew)    |
//! | `Cache`            | ✅          | ✅      | ✅         | yes (AsNew)    |
//! | `SkipList`         | ✅          | ✅      | ❌         | no             |
//!
//! `get` takes `&mut self` because caches reorder on read. `peek` never
//! reorders anything.
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::ds::{OrderedMap, SkipList};
//! use ordcache::policy::lru::LruCache;
//! use ordcache::traits::{BoundedMap, CoreMap};
//!
//! fn warm<M: CoreMap<u64, String>>(map: &mut M, keys: &[u64]) {
//!     for &k in keys {
//!         map.insert(k, format!("v{k}"));
//!     }
//! }
//!
//! let mut ordered = OrderedMap::new();
//! let mut sorted = SkipList::new();
//! let mut cache = LruCache::with_limit(2);
//! warm(&mut ordered, &[3, 1, 2]);
//! warm(&mut sorted, &[3, 1, 2]);
//! warm(&mut cache, &[3, 1, 2]);
//!
//! assert_eq!(ordered.len(), 3);
//! assert_eq!(sorted.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(cache.len(), 2);
//! assert_eq!(BoundedMap::limit(&cache), 2);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;

use crate::ds::ordered_map::{OrderedMap, Touch};
use crate::ds::skip_list::{LevelGenerator, SkipList};
use crate::policy::bounded::{BoundedCache, TrimPolicy};

/// Lookups that never change ordering.
pub trait ReadOnlyMap<K, V> {
    fn contains(&self, key: &K) -> bool;

    /// Reads without touching.
    fn peek(&self, key: &K) -> Option<&V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes plus a `get` that is allowed to update ordering.
pub trait CoreMap<K, V>: ReadOnlyMap<K, V> {
    /// Inserts or overwrites; returns the previous value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn get(&mut self, key: &K) -> Option<&V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    fn clear(&mut self);
}

/// Capacity-limited maps that trim on overflow.
pub trait BoundedMap<K, V>: CoreMap<K, V> {
    fn limit(&self) -> usize;

    /// Changes the limit; trims right away if now over it.
    fn set_limit(&mut self, limit: usize);

    fn ratio(&self) -> f64;

    /// Changes the trim ratio; clamped into `[0, 1]`.
    fn set_ratio(&mut self, ratio: f64);
}

// ---------------------------------------------------------------------------
// OrderedMap
// ---------------------------------------------------------------------------

impl<K: Clone + Eq + Hash, V> ReadOnlyMap<K, V> for OrderedMap<K, V> {
    fn contains(&self, key: &K) -> bool {
        OrderedMap::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        OrderedMap::get(self, key)
    }

    fn len(&self) -> usize {
        OrderedMap::len(self)
    }
}

impl<K: Clone + Eq + Hash, V> CoreMap<K, V> for OrderedMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        OrderedMap::insert(self, key, value, Touch::None)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        OrderedMap::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        OrderedMap::remove(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        OrderedMap::delete(self, key)
    }

    fn clear(&mut self) {
        OrderedMap::clear(self);
    }
}

// ---------------------------------------------------------------------------
// BoundedCache
// ---------------------------------------------------------------------------

impl<K: Clone + Eq + Hash, V, P: TrimPolicy> ReadOnlyMap<K, V> for BoundedCache<K, V, P> {
    fn contains(&self, key: &K) -> bool {
        BoundedCache::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        BoundedCache::peek(self, key)
    }

    fn len(&self) -> usize {
        BoundedCache::len(self)
    }
}

impl<K: Clone + Eq + Hash, V, P: TrimPolicy> CoreMap<K, V> for BoundedCache<K, V, P> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BoundedCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        BoundedCache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BoundedCache::remove(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        BoundedCache::delete(self, key)
    }

    fn clear(&mut self) {
        BoundedCache::clear(self);
    }
}

impl<K: Clone + Eq + Hash, V, P: TrimPolicy> BoundedMap<K, V> for BoundedCache<K, V, P> {
    fn limit(&self) -> usize {
        BoundedCache::limit(self)
    }

    fn set_limit(&mut self, limit: usize) {
        BoundedCache::set_limit(self, limit);
    }

    fn ratio(&self) -> f64 {
        BoundedCache::ratio(self)
    }

    fn set_ratio(&mut self, ratio: f64) {
        BoundedCache::set_ratio(self, ratio);
    }
}

// ---------------------------------------------------------------------------
// SkipList
// ---------------------------------------------------------------------------

impl<K, V, C, G> ReadOnlyMap<K, V> for SkipList<K, V, C, G>
where
    C: Fn(&K, &K) -> Ordering,
    G: LevelGenerator,
{
    fn contains(&self, key: &K) -> bool {
        SkipList::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        SkipList::get(self, key)
    }

    fn len(&self) -> usize {
        SkipList::len(self)
    }
}

impl<K, V, C, G> CoreMap<K, V> for SkipList<K, V, C, G>
where
    C: Fn(&K, &K) -> Ordering,
    G: LevelGenerator,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        SkipList::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        SkipList::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        SkipList::remove(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        SkipList::delete(self, key)
    }

    fn clear(&mut self) {
        SkipList::clear(self);
    }
}
