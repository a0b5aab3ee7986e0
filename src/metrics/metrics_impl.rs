use crate::metrics::traits::{CoreMetricsRecorder, MetricsReset};

#[derive(Debug, Default, Clone)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub trim_calls: u64,
    pub evicted_entries: u64,
    pub clears: u64,
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_trim_call(&mut self) {
        self.trim_calls += 1;
    }
    fn record_evicted_entries(&mut self, count: usize) {
        self.evicted_entries += count as u64;
    }
    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl MetricsReset for CacheMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}
