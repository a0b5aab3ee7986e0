//! MRU (Most Recently Used) trimming.
//!
//! On overflow, drops entries from the tail of the recency list: the ones
//! touched last. Useful for cyclic scans larger than the cache, where the
//! entry just used is the one needed furthest in the future.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MruCache<K, V> (limit 3)                       │
//! │                                                                         │
//! │   head (least recent)                            tail (most recent)     │
//! │   [a] ◄──► [b] ◄──► [c]                                   EVICT HERE    │
//! │                                                                         │
//! │   set(d), d not cached, len 3 >= limit 3:                               │
//! │     pre-trim to round(3 * 1.0) - 1 = 2  ─► [a] [b]                      │
//! │     insert d at tail                    ─► [a] [b] [d]                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Trimming after the insert would throw away the entry just written, so a
//! new key first makes room by trimming to one below the target. Overwrites
//! of cached keys never pre-trim.
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::policy::mru::MruCache;
//!
//! let mut cache = MruCache::with_limit(1);
//! cache.set("a", 1).set("b", 2);
//!
//! assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["b"]);
//! ```

use std::hash::Hash;

use crate::ds::ordered_map::OrderedMap;
use crate::policy::bounded::{BoundedCache, TrimPolicy, trim_target};

/// Evicts from the most recently used end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mru;

impl TrimPolicy for Mru {
    const NAME: &'static str = "MRU";

    #[inline]
    fn trim<K: Clone + Eq + Hash, V>(map: &mut OrderedMap<K, V>, target: usize) -> usize {
        map.trim_new(target)
    }

    fn before_insert<K: Clone + Eq + Hash, V>(
        map: &mut OrderedMap<K, V>,
        limit: usize,
        ratio: f64,
    ) -> usize {
        if limit == 0 || map.len() < limit {
            return 0;
        }
        map.trim_new(trim_target(limit, ratio).saturating_sub(1))
    }
}

/// Bounded cache that evicts most recently used entries.
pub type MruCache<K, V> = BoundedCache<K, V, Mru>;
