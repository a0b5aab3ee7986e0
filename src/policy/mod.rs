//! Eviction policies for [`BoundedCache`](bounded::BoundedCache).
//!
//! | Policy | Evicts from          | Type alias  |
//! |--------|----------------------|-------------|
//! | LRU    | least recently used  | `LruCache`  |
//! | MRU    | most recently used   | `MruCache`  |

pub mod bounded;
pub mod lru;
pub mod mru;
