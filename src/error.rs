//! Error types for the ordcache library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: internal list pointers are inconsistent. Always a bug
//!   in this crate, never caused by input.
//! - [`ConfigError`]: a strict constructor was handed an unusable parameter
//!   (e.g. a NaN or out-of-range ratio). The lenient constructors clamp instead.
//! - [`MapError`]: what fallible map operations return; either a traversal
//!   that outlived a structural change or a wrapped [`InvariantError`].
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::ds::{OrderedMap, Touch};
//! use ordcache::error::MapError;
//!
//! let mut map = OrderedMap::new();
//! map.set("a", 1, Touch::None).set("b", 2, Touch::None);
//!
//! let mut cursor = map.cursor();
//! assert_eq!(cursor.next(&map).unwrap(), Some((&"a", &1)));
//!
//! map.delete(&"b");
//! assert!(matches!(
//!     cursor.next(&map),
//!     Err(MapError::IterationInvalidated { .. })
//! ));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal list invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned by strict constructors such as
/// [`BoundedCache::try_new`](crate::policy::bounded::BoundedCache::try_new)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use ordcache::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(10, 1.5).unwrap_err();
/// assert!(err.to_string().contains("ratio"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// MapError
// ---------------------------------------------------------------------------

/// Failure of a map operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map was structurally modified after the traversal started.
    ///
    /// Carries the generation the traversal started at and the one it found.
    IterationInvalidated { expected: u64, found: u64 },
    /// Internal pointers disagree with each other.
    Invariant(InvariantError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::IterationInvalidated { expected, found } => write!(
                f,
                "map modified during iteration (generation {expected} -> {found})"
            ),
            MapError::Invariant(err) => write!(f, "invariant violated: {err}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Invariant(err) => Some(err),
            MapError::IterationInvalidated { .. } => None,
        }
    }
}

impl From<InvariantError> for MapError {
    fn from(err: InvariantError) -> Self {
        MapError::Invariant(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
