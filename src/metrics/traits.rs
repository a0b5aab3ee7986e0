//! Recorder and provider traits.
//!
//! ```text
//!   cache operation ──► CoreMetricsRecorder ──► CacheMetrics (plain u64s)
//!                                                    │
//!   caller ◄── CacheMetricsSnapshot ◄── MetricsSnapshotProvider
//! ```
//!
//! Recorders take `&mut self`: the caches are single-threaded and already
//! hold `&mut` on every counted path, so no interior mutability is needed.

/// Counters shared by every bounded cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_trim_call(&mut self);
    fn record_evicted_entries(&mut self, count: usize);
    fn record_clear(&mut self);
}

/// Point-in-time copy of a recorder.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset counters between test or benchmark phases.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}
