/// Copy of a cache's counters plus gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub trim_calls: u64,
    pub evicted_entries: u64,
    pub clears: u64,

    // gauges
    pub cache_len: usize,
    pub limit: usize,
}

impl CacheMetricsSnapshot {
    /// Hits over lookups, or `None` before the first lookup.
    pub fn hit_rate(&self) -> Option<f64> {
        (self.get_calls > 0).then(|| self.get_hits as f64 / self.get_calls as f64)
    }
}
