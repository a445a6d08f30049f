//! # Cache Traits
//!
//! Policy-facing interface of the cache. Callers that only need memoized,
//! capacity-bounded storage can be written against [`CoreCache`]; callers that
//! want to inspect frequency state use [`LfuCacheTrait`].
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  put(&mut, K, V) → Option<V>            │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len(&) → usize                         │
//!   │  is_empty(&) → bool                     │
//!   │  capacity(&) → usize                    │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LfuCacheTrait<K, V>            │
//!   │                                         │
//!   │  peek_lfu(&) → Option<(&K, &V)>         │
//!   │  frequency(&, &K) → Option<u64>         │
//!   │  min_frequency(&) → Option<u64>         │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no `remove`: entries leave the cache only through
//! eviction.

/// Operations every cache exposes.
///
/// # Example
///
/// ```
/// use freqcache::traits::CoreCache;
/// use freqcache::policy::lfu::LfuCache;
///
/// fn warm<C: CoreCache<u32, String>>(cache: &mut C, items: &[(u32, &str)]) {
///     for (key, value) in items {
///         cache.put(*key, value.to_string());
///     }
/// }
///
/// let mut cache = LfuCache::new(10);
/// warm(&mut cache, &[(1, "one"), (2, "two")]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates a key-value pair, returning the previous value.
    ///
    /// Updating an existing key counts as a use. If the cache is full and
    /// `key` is new, one entry is evicted first. Under capacity 0 nothing is
    /// stored.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a value by key, counting the access as a use.
    ///
    /// `None` is the miss result; it never stands for a stored value.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks membership without counting a use.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, fixed at construction.
    fn capacity(&self) -> usize;
}

/// Frequency-aware inspection for LFU caches.
///
/// # Example
///
/// ```
/// use freqcache::traits::{CoreCache, LfuCacheTrait};
/// use freqcache::policy::lfu::LfuCache;
///
/// let mut cache: LfuCache<u64, &str> = LfuCache::new(3);
/// cache.put(1, "first");
/// cache.put(2, "second");
/// cache.get(&1);
///
/// assert_eq!(cache.frequency(&1), Some(2));
/// assert_eq!(cache.frequency(&2), Some(1));
/// assert_eq!(cache.min_frequency(), Some(1));
/// assert_eq!(cache.peek_lfu().map(|(k, _)| *k), Some(2));
/// ```
pub trait LfuCacheTrait<K, V>: CoreCache<K, V> {
    /// The entry the next eviction would remove, without counting a use.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Use count of `key`, `None` if absent.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Smallest use count currently held, `None` if empty.
    fn min_frequency(&self) -> Option<u64>;
}
