//! LRU (Least Recently Used) trimming.
//!
//! On overflow, drops entries from the head of the recency list, i.e. the
//! ones that have gone longest without a read or write.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          LruCache<K, V> (limit 4)                       │
//! │                                                                         │
//! │   head (least recent)                            tail (most recent)     │
//! │   [a] ◄──► [b] ◄──► [c] ◄──► [d]                                        │
//! │                                                                         │
//! │   set(e)   ─► [a] [b] [c] [d] [e]        len 5 > limit 4                │
//! │   trim     ─►     [b] [c] [d] [e]        target round(4 * 1.0) = 4      │
//! │   get(b)   ─►         [c] [d] [e] [b]                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::policy::lru::LruCache;
//!
//! let mut cache = LruCache::with_limit(2);
//! cache.set("a", 1).set("b", 2);
//! cache.get(&"a");
//! cache.set("c", 3);
//!
//! let keys: Vec<_> = cache.keys().copied().collect();
//! assert_eq!(keys, vec!["a", "c"]);
//! ```

use std::hash::Hash;

use crate::ds::ordered_map::OrderedMap;
use crate::policy::bounded::{BoundedCache, TrimPolicy};

/// Evicts from the least recently used end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lru;

impl TrimPolicy for Lru {
    const NAME: &'static str = "LRU";

    #[inline]
    fn trim<K: Clone + Eq + Hash, V>(map: &mut OrderedMap<K, V>, target: usize) -> usize {
        map.trim_old(target)
    }
}

/// Bounded cache that evicts least recently used entries.
pub type LruCache<K, V> = BoundedCache<K, V, Lru>;
