//! ordcache: insertion-ordered maps, recency-bounded caches and skip lists.
//!
//! - [`ds::OrderedMap`]: hash map that remembers insertion order and can move
//!   entries to either end on access.
//! - [`policy::lru::LruCache`] / [`policy::mru::MruCache`]: bounded caches
//!   built on the ordered map, trimming from one end on overflow.
//! - [`builder::CacheBuilder`]: picks the policy at runtime.
//! - [`ds::SkipList`]: ordered map sorted by a comparator.
//!
//! All structures are arena-backed; nothing in the crate uses `unsafe`.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
