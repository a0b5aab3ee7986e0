//! Optional per-cache counters (`metrics` feature).
//!
//! Recording, snapshotting and consumption are kept apart: caches own a
//! [`CacheMetrics`](metrics_impl::CacheMetrics) and write to it through
//! [`CoreMetricsRecorder`](traits::CoreMetricsRecorder); readers take a
//! [`CacheMetricsSnapshot`](snapshot::CacheMetricsSnapshot) through
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider).

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
