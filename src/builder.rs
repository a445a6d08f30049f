//! Cache construction with validated configuration.
//!
//! [`LfuCacheBuilder`] collects the capacity and sizing hints in one place.
//! Capacities arriving from signed sources (configuration files, CLI flags
//! parsed as `i64`) go through [`LfuCacheBuilder::from_signed`], and a
//! negative value surfaces as a [`ConfigError`] at build time instead of being
//! clamped.
//!
//! ## Example
//!
//! ```rust
//! use freqcache::builder::LfuCacheBuilder;
//! use freqcache::traits::CoreCache;
//!
//! let mut cache = LfuCacheBuilder::new(100)
//!     .bucket_hint(64)
//!     .build::<u64, String>();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//!
//! let rejected = LfuCacheBuilder::from_signed(-10).try_build::<u64, String>();
//! assert!(rejected.is_err());
//! ```

use std::hash::Hash;

use crate::ds::frequency_buckets::DEFAULT_BUCKET_PREALLOC;
use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::policy::lfu::ConcurrentLfuCache;
use crate::policy::lfu::{LfuCache, checked_capacity};

/// Builder for [`LfuCache`] and, with the `concurrency` feature,
/// [`ConcurrentLfuCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheBuilder {
    // Err carries the rejected signed value until build time.
    capacity: Result<usize, i64>,
    bucket_hint: usize,
}

impl LfuCacheBuilder {
    /// Starts a builder for a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: Ok(capacity),
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Starts a builder from a signed capacity; negative values fail in
    /// [`try_build`](Self::try_build).
    pub fn from_signed(capacity: i64) -> Self {
        Self {
            capacity: usize::try_from(capacity).map_err(|_| capacity),
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Expected number of distinct frequencies, used to pre-size the bucket map.
    pub fn bucket_hint(mut self, bucket_hint: usize) -> Self {
        self.bucket_hint = bucket_hint;
        self
    }

    /// Builds the cache, rejecting a negative capacity.
    pub fn try_build<K, V>(self) -> Result<LfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let capacity = match self.capacity {
            Ok(capacity) => capacity,
            Err(signed) => checked_capacity(signed)?,
        };
        Ok(LfuCache::with_bucket_hint(capacity, self.bucket_hint))
    }

    /// Builds the cache. Infallible for builders made with [`new`](Self::new);
    /// prefer [`try_build`](Self::try_build) for signed input.
    ///
    /// # Panics
    ///
    /// Panics if the builder was created from a negative signed capacity.
    pub fn build<K, V>(self) -> LfuCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }

    /// Builds a mutex-guarded cache for shared use.
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent<K, V>(self) -> Result<ConcurrentLfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build().map(ConcurrentLfuCache::from_cache)
    }
}
