//! Capacity-bounded cache over an [`OrderedMap`].
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                    BoundedCache<K, V, P: TrimPolicy>                  │
//! │                                                                       │
//! │   limit: usize        ratio: f64 in [0, 1]        P: Lru | Mru        │
//! │                                                                       │
//! │   map: OrderedMap<K, V>                                               │
//! │     head (least recently used) ◄──────────► tail (most recently used) │
//! │                                                                       │
//! │   get / set  ──► touch AsNew (entry moves to tail)                    │
//! │   peek       ──► no movement                                          │
//! │   set        ──► P::before_insert ─► insert ─► check_trim             │
//! │   check_trim ──► len > limit ? P::trim(round(limit * ratio))          │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every read and write counts as a use and moves the entry to the tail, so
//! the list is a recency list. The policy decides which end to cut when the
//! cache overflows: [`Lru`](crate::policy::lru::Lru) trims the head,
//! [`Mru`](crate::policy::mru::Mru) the tail.
//!
//! ## Trim Target
//!
//! Overflow trims down to `round(limit * ratio)` rather than to `limit`, so a
//! ratio below 1 frees room for several inserts per trim. `ratio = 0` empties
//! the cache on every overflow; `ratio = 1` trims back to exactly `limit`.
//!
//! ## Configuration
//!
//! [`BoundedCache::new`] and the setters clamp `ratio` into `[0, 1]` and never
//! fail. [`BoundedCache::try_new`] rejects out-of-range or non-finite ratios
//! with a [`ConfigError`] for callers passing through user configuration.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use log::{debug, trace};

use crate::ds::ordered_map::{Cursor, Iter, Keys, OrderedMap, Touch, Values};
use crate::error::{ConfigError, MapError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsReset, MetricsSnapshotProvider};

/// Ratio used by [`BoundedCache::with_limit`]: trim back to exactly `limit`.
pub const DEFAULT_RATIO: f64 = 1.0;

/// Eviction strategy plugged into [`BoundedCache`].
pub trait TrimPolicy {
    /// Short policy name for logs and `Debug` output.
    const NAME: &'static str;

    /// Reduces `map` to at most `target` entries; returns how many were evicted.
    fn trim<K: Clone + Eq + Hash, V>(map: &mut OrderedMap<K, V>, target: usize) -> usize;

    /// Runs before a key that is not yet cached gets inserted. Returns the
    /// number of evicted entries.
    fn before_insert<K: Clone + Eq + Hash, V>(
        _map: &mut OrderedMap<K, V>,
        _limit: usize,
        _ratio: f64,
    ) -> usize {
        0
    }
}

/// `round(limit * ratio)`.
#[inline]
pub fn trim_target(limit: usize, ratio: f64) -> usize {
    (limit as f64 * ratio).round() as usize
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        DEFAULT_RATIO
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Recency-ordered cache holding at most `limit` entries.
pub struct BoundedCache<K, V, P> {
    map: OrderedMap<K, V>,
    limit: usize,
    ratio: f64,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
    _policy: PhantomData<P>,
}

impl<K, V, P> BoundedCache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: TrimPolicy,
{
    /// Creates a cache; `ratio` is clamped into `[0, 1]` (NaN becomes 1).
    pub fn new(limit: usize, ratio: f64) -> Self {
        Self {
            map: OrderedMap::with_capacity(limit.saturating_add(1).min(1 << 16)),
            limit,
            ratio: clamp_ratio(ratio),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
            _policy: PhantomData,
        }
    }

    /// Creates a cache that trims back to exactly `limit`.
    pub fn with_limit(limit: usize) -> Self {
        Self::new(limit, DEFAULT_RATIO)
    }

    /// Strict constructor: fails instead of clamping.
    ///
    /// ```
    /// use ordcache::policy::mru::MruCache;
    ///
    /// assert!(MruCache::<u8, u8>::try_new(4, 0.5).is_ok());
    /// assert!(MruCache::<u8, u8>::try_new(4, -0.1).is_err());
    /// assert!(MruCache::<u8, u8>::try_new(4, f64::NAN).is_err());
    /// ```
    pub fn try_new(limit: usize, ratio: f64) -> Result<Self, ConfigError> {
        if !ratio.is_finite() {
            return Err(ConfigError::new(format!("ratio must be finite, got {ratio}")));
        }
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::new(format!(
                "ratio must be within [0, 1], got {ratio}"
            )));
        }
        Ok(Self::new(limit, ratio))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Changes the limit and trims immediately if the cache is now over it.
    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        debug!("{} cache limit {} -> {}", P::NAME, self.limit, limit);
        self.limit = limit;
        self.check_trim();
        self
    }

    /// Changes the trim ratio (clamped). Takes effect on the next overflow.
    pub fn set_ratio(&mut self, ratio: f64) -> &mut Self {
        let ratio = clamp_ratio(ratio);
        debug!("{} cache ratio {} -> {}", P::NAME, self.ratio, ratio);
        self.ratio = ratio;
        self
    }

    /// Size the cache is cut down to on overflow.
    #[inline]
    pub fn trim_target(&self) -> usize {
        trim_target(self.limit, self.ratio)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains(key)
    }

    /// Reads `key` and marks it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        {
            if self.map.contains(key) {
                self.metrics.record_get_hit();
            } else {
                self.metrics.record_get_miss();
            }
        }
        self.map.get_touch(key, Touch::AsNew)
    }

    /// Mutable read; also marks `key` as most recently used.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if !self.map.touch(key, Touch::AsNew) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        self.map.get_mut(key)
    }

    /// Reads `key` without affecting eviction order.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Inserts or overwrites `key` as most recently used, then trims if the
    /// cache overflowed. Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.map.contains(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_new();
            let evicted = P::before_insert(&mut self.map, self.limit, self.ratio);
            if evicted > 0 {
                trace!("{} pre-insert trim evicted {evicted}", P::NAME);
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_trim_call();
                    self.metrics.record_evicted_entries(evicted);
                }
            }
        }

        let old = self.map.insert(key, value, Touch::AsNew);
        self.check_trim();
        old
    }

    /// Chainable form of [`insert`](Self::insert).
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.insert(key, value);
        self
    }

    /// Trims to [`trim_target`](Self::trim_target) if `len() > limit()`.
    /// Returns the number of evicted entries.
    pub fn check_trim(&mut self) -> usize {
        if self.map.len() <= self.limit {
            return 0;
        }
        let target = self.trim_target();
        let evicted = P::trim(&mut self.map, target);
        trace!(
            "{} trim to {target} evicted {evicted} (limit {})",
            P::NAME,
            self.limit
        );
        #[cfg(feature = "metrics")]
        {
            self.metrics.record_trim_call();
            self.metrics.record_evicted_entries(evicted);
        }
        evicted
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.map.delete(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    /// Removes the least recently used entry.
    pub fn shift(&mut self) -> Result<Option<(K, V)>, MapError> {
        self.map.shift()
    }

    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.map.clear();
    }

    /// Entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.map.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.map.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.map.values()
    }

    pub fn for_each(&self, f: impl FnMut(&K, &V)) {
        self.map.for_each(f);
    }

    /// Generation-checked traversal; see [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        self.map.cursor()
    }

    /// Read-only view of the underlying ordered map. Cursors obtained from
    /// [`cursor`](Self::cursor) are advanced against this.
    pub fn as_map(&self) -> &OrderedMap<K, V> {
        &self.map
    }

    /// Structural generation of the underlying map.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.map.generation()
    }

    pub fn to_entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.map.to_entries()
    }

    /// Replaces the contents with `pairs`, inserting each one through
    /// [`insert`](Self::insert) so the policy trims exactly as it would for
    /// the same sequence of `set` calls.
    pub fn load_entries<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.clear();
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.map.debug_validate_invariants();
        assert!(self.map.len() <= self.limit, "cache exceeds its limit");
        assert!((0.0..=1.0).contains(&self.ratio));
    }
}

impl<K, V, P> Clone for BoundedCache<K, V, P>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            limit: self.limit,
            ratio: self.ratio,
            #[cfg(feature = "metrics")]
            metrics: self.metrics.clone(),
            _policy: PhantomData,
        }
    }
}

impl<K, V, P> fmt::Debug for BoundedCache<K, V, P>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    P: TrimPolicy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("policy", &P::NAME)
            .field("limit", &self.limit)
            .field("ratio", &self.ratio)
            .field("entries", &self.map)
            .finish()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> BoundedCache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: TrimPolicy,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            trim_calls: self.metrics.trim_calls,
            evicted_entries: self.metrics.evicted_entries,
            clears: self.metrics.clears,
            cache_len: self.map.len(),
            limit: self.limit,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsSnapshotProvider<CacheMetricsSnapshot> for BoundedCache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: TrimPolicy,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsReset for BoundedCache<K, V, P> {
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}
