//! Error types for the freqcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. a negative capacity handed to a signed constructor).
//! - [`InvariantError`]: Returned by `check_invariants` when the internal
//!   bucket structure disagrees with itself.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::error::ConfigError;
//! use freqcache::policy::lfu::LfuCache;
//!
//! let cache: Result<LfuCache<String, i32>, ConfigError> = LfuCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! // Negative capacity is rejected, never clamped to zero
//! let bad = LfuCache::<String, i32>::try_new(-1);
//! assert!(bad.is_err());
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new) and
/// [`LfuCacheBuilder::try_build`](crate::builder::LfuCacheBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use freqcache::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(-5).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn negative_capacity(capacity: i64) -> Self {
        Self::new(format!("capacity must be non-negative, got {capacity}"))
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`FrequencyBuckets::check_invariants`](crate::ds::FrequencyBuckets::check_invariants)
/// and [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
