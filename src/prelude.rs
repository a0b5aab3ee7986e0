pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{CoinFlip, Cursor, LevelGenerator, OrderedMap, SkipList, Touch};
pub use crate::error::{ConfigError, InvariantError, MapError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::bounded::{BoundedCache, TrimPolicy};
pub use crate::policy::lru::{Lru, LruCache};
pub use crate::policy::mru::{Mru, MruCache};
pub use crate::traits::{BoundedMap, CoreMap, ReadOnlyMap};
