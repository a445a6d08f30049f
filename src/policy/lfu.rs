//! # LFU (Least Frequently Used) Cache
//!
//! Capacity-bounded cache that evicts the entry with the fewest uses, breaking
//! ties by evicting the least recently used entry among those with the lowest
//! count. `get` and `put` are O(1).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                             LfuCache<K, V>                               │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  values: FxHashMap<K, V>            (entry table)                  │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  freq: FrequencyBuckets<K>                                         │ │
//!   │   │                                                                    │ │
//!   │   │   min_freq ─► freq=1: [page_3] ◄──► [page_9]    oldest → newest    │ │
//!   │   │               freq=3: [page_2]                                     │ │
//!   │   │               freq=7: [page_4] ◄──► [page_1]                       │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   capacity: usize  (fixed at construction)                               │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! ```text
//!   get(&key)
//!     absent  → None, nothing changes
//!     present → freq f → f+1, key moves to the newest end of bucket f+1
//!
//!   put(key, value)
//!     capacity == 0          → dropped, nothing stored
//!     key present            → value replaced, same promotion as get
//!     key absent, cache full → evict oldest key of the min_freq bucket
//!     key absent             → insert at freq 1, newest end of bucket 1
//! ```
//!
//! Updating an existing key counts as a use, so `put` on a present key raises
//! its frequency exactly like `get` does.
//!
//! ## Tie-Breaking
//!
//! Within one frequency, keys are ordered by the moment they entered that
//! frequency. A key that is touched leaves its bucket and joins the next one
//! as its newest member, so each bucket is always ordered oldest to newest by
//! last use and the oldest member is the eviction candidate.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::traits::{CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(2);
//! cache.put(1, 10);
//! cache.put(2, 20);
//! assert_eq!(cache.get(&1), Some(&10));
//!
//! // key 2 has the lowest frequency
//! cache.put(3, 30);
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&3), Some(&30));
//! assert_eq!(cache.frequency(&1), Some(2));
//! ```
//!
//! ## Thread Safety
//!
//! `LfuCache` is not `Sync`-usable on its own: `get` needs `&mut self` because
//! it promotes. Use `ConcurrentLfuCache` (feature `concurrency`) or wrap it in
//! a single mutex. A reader/writer lock does not help since every `get` is a
//! write.

use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::ds::frequency_buckets::{DEFAULT_BUCKET_PREALLOC, FrequencyBuckets};
use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, LfuCacheTrait};

// Upper bound on eager allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// LFU cache with LRU tie-breaking.
///
/// See the module-level documentation for the eviction rules.
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    values: FxHashMap<K, V>,
    freq: FrequencyBuckets<K>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 yields a cache that never stores anything.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::CoreCache;
    ///
    /// let cache: LfuCache<u32, String> = LfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Creates a cache and pre-sizes the bucket map for `bucket_hint`
    /// distinct frequencies.
    pub fn with_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);
        debug!(capacity, bucket_hint, "creating lfu cache");
        LfuCache {
            values: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            freq: FrequencyBuckets::with_capacity_and_bucket_hint(prealloc, bucket_hint),
            capacity,
        }
    }

    /// Creates a cache from a signed capacity, rejecting negative values.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// assert!(LfuCache::<u8, u8>::try_new(0).is_ok());
    /// assert!(LfuCache::<u8, u8>::try_new(-1).is_err());
    /// ```
    pub fn try_new(capacity: i64) -> Result<Self, ConfigError> {
        Ok(Self::new(checked_capacity(capacity)?))
    }

    /// Reads a value without counting a use.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Returns the cached value for `key`, computing and inserting it on a miss.
    ///
    /// A hit counts as a use. A miss inserts the computed value at frequency 1
    /// (possibly evicting). Returns `None` only when the capacity is 0, in
    /// which case `f` is never called.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::LfuCacheTrait;
    ///
    /// let mut cache = LfuCache::new(8);
    /// let mut calls = 0;
    /// for _ in 0..3 {
    ///     let v = cache.get_or_insert_with("sq(12)", || { calls += 1; 144 });
    ///     assert_eq!(v, Some(&144));
    /// }
    /// assert_eq!(calls, 1);
    /// assert_eq!(cache.frequency(&"sq(12)"), Some(3));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce() -> V,
    {
        if self.freq.touch(&key).is_some() {
            return self.values.get(&key);
        }
        if self.capacity == 0 {
            return None;
        }
        self.insert_new(key.clone(), f());
        self.values.get(&key)
    }

    /// Iterates `(key, value, frequency)` in arbitrary order without counting uses.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, u64)> + '_ {
        self.values
            .iter()
            .map(|(key, value)| (key, value, self.freq.frequency(key).unwrap_or(0)))
    }

    /// Verifies that the entry table and the frequency buckets agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.values.len() > self.capacity {
            return Err(InvariantError::new("cache holds more entries than capacity"));
        }
        if self.values.len() != self.freq.len() {
            return Err(InvariantError::new(
                "entry table and frequency buckets disagree on size",
            ));
        }
        if self.values.keys().any(|key| !self.freq.contains(key)) {
            return Err(InvariantError::new("cached key missing from frequency buckets"));
        }
        self.freq.check_invariants()
    }

    fn insert_new(&mut self, key: K, value: V) {
        if self.values.len() >= self.capacity {
            self.evict();
        }
        self.freq.insert(key.clone());
        self.values.insert(key, value);
    }

    fn evict(&mut self) {
        let Some((key, freq)) = self.freq.pop_min() else {
            return;
        };
        self.values.remove(&key);
        trace!(evicted_freq = freq, len = self.values.len(), "lfu eviction");
    }
}

pub(crate) fn checked_capacity(capacity: i64) -> Result<usize, ConfigError> {
    usize::try_from(capacity).map_err(|_| {
        warn!(capacity, "rejecting negative cache capacity");
        ConfigError::negative_capacity(capacity)
    })
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(slot) = self.values.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            self.freq.touch(&key);
            return Some(previous);
        }

        self.insert_new(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.freq.touch(key)?;
        self.values.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (key, _) = self.freq.peek_min()?;
        let value = self.values.get(key)?;
        Some((key, value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.freq.frequency(key)
    }

    fn min_frequency(&self) -> Option<u64> {
        self.freq.min_freq()
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.values.len())
            .field("capacity", &self.capacity)
            .field("min_freq", &self.freq.min_freq())
            .finish_non_exhaustive()
    }
}

// Send + Sync analysis:
// - LfuCache is Send if K and V are Send
// - LfuCache is not usefully Sync: get() takes &mut self
// - ConcurrentLfuCache provides shared access behind one lock

/// Thread-safe LFU cache: one `parking_lot::Mutex` around the whole engine.
///
/// The entry table and the frequency buckets change together on every `get`
/// and `put`, so they sit behind a single guard. Cloning shares the cache.
///
/// # Example
///
/// ```
/// use std::thread;
/// use freqcache::policy::lfu::ConcurrentLfuCache;
///
/// let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(64);
/// let handles: Vec<_> = (0..4u32)
///     .map(|t| {
///         let cache = cache.clone();
///         thread::spawn(move || {
///             for i in 0..16 {
///                 cache.put(t * 16 + i, i);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(cache.len(), 64);
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LfuCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLfuCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(LfuCache::new(capacity))
    }

    /// Signed-capacity constructor; negative values are rejected.
    pub fn try_new(capacity: i64) -> Result<Self, ConfigError> {
        LfuCache::try_new(capacity).map(Self::from_cache)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: LfuCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Inserts or updates, returning the previous value.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    /// Gets a clone of the value, counting the access as a use.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Gets a clone of the value without counting a use.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Memoizer entry point. `f` runs while the lock is held.
    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> Option<V>
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        self.inner.lock().get_or_insert_with(key, f).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Runs `f` with exclusive access, for multi-step sequences that must
    /// not interleave with other callers.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::ConcurrentLfuCache;
    /// use freqcache::traits::{CoreCache, LfuCacheTrait};
    ///
    /// let cache = ConcurrentLfuCache::new(2);
    /// cache.put("a", 1);
    /// let bumped = cache.with_lock(|c| {
    ///     let v = c.get(&"a").copied();
    ///     (v, c.frequency(&"a"))
    /// });
    /// assert_eq!(bumped, (Some(1), Some(2)));
    /// ```
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LfuCache<K, V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_behavior {
        use super::*;

        #[test]
        fn insertion_and_retrieval() {
            let mut cache = LfuCache::new(3);
            assert_eq!(cache.put("key1".to_string(), 100), None);
            assert_eq!(cache.put("key2".to_string(), 200), None);
            assert_eq!(cache.put("key3".to_string(), 300), None);

            assert_eq!(cache.get(&"key1".to_string()), Some(&100));
            assert_eq!(cache.get(&"key2".to_string()), Some(&200));
            assert_eq!(cache.get(&"key3".to_string()), Some(&300));
            assert_eq!(cache.get(&"nonexistent".to_string()), None);

            assert_eq!(cache.frequency(&"key1".to_string()), Some(2));
            assert_eq!(cache.frequency(&"key2".to_string()), Some(2));
            assert_eq!(cache.frequency(&"key3".to_string()), Some(2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn eviction_picks_lowest_frequency() {
            let mut cache = LfuCache::new(3);
            cache.put("key1", 100);
            cache.put("key2", 200);
            cache.put("key3", 300);

            cache.get(&"key2");
            cache.get(&"key2");
            cache.get(&"key3");

            assert_eq!(cache.frequency(&"key1"), Some(1));
            assert_eq!(cache.frequency(&"key2"), Some(3));
            assert_eq!(cache.frequency(&"key3"), Some(2));

            cache.put("key4", 400);
            assert!(!cache.contains(&"key1"));
            assert!(cache.contains(&"key2"));
            assert!(cache.contains(&"key3"));
            assert!(cache.contains(&"key4"));
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn capacity_is_enforced() {
            let mut cache = LfuCache::new(2);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 2);

            for i in 1..=10 {
                cache.put(format!("key{}", i), i * 100);
                assert!(cache.len() <= cache.capacity());
            }
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn update_counts_as_use() {
            let mut cache = LfuCache::new(3);
            assert_eq!(cache.put("key1", 100), None);
            assert_eq!(cache.frequency(&"key1"), Some(1));

            cache.get(&"key1");
            cache.get(&"key1");
            assert_eq!(cache.frequency(&"key1"), Some(3));

            assert_eq!(cache.put("key1", 999), Some(100));
            assert_eq!(cache.frequency(&"key1"), Some(4));
            assert_eq!(cache.peek(&"key1"), Some(&999));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn repeated_get_returns_same_value_with_rising_frequency() {
            let mut cache = LfuCache::new(2);
            cache.put('a', "alpha");
            let mut last = cache.frequency(&'a').unwrap();
            for _ in 0..10 {
                assert_eq!(cache.get(&'a'), Some(&"alpha"));
                let now = cache.frequency(&'a').unwrap();
                assert_eq!(now, last + 1);
                last = now;
            }
        }
    }

    mod tie_breaking {
        use super::*;

        #[test]
        fn oldest_of_lowest_frequency_is_evicted() {
            let mut cache = LfuCache::new(3);
            cache.put(1, ());
            cache.put(2, ());
            cache.put(3, ());
            cache.put(4, ());
            assert!(!cache.contains(&1));
            cache.put(5, ());
            assert!(!cache.contains(&2));
        }

        #[test]
        fn promotion_resets_position_in_new_bucket() {
            let mut cache = LfuCache::new(3);
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("c", 3);
            // b enters bucket 2 before a does
            cache.get(&"b");
            cache.get(&"a");
            // c is the only freq-1 entry
            cache.put("d", 4);
            assert!(!cache.contains(&"c"));
            // d is now the only freq-1 entry
            cache.put("e", 5);
            assert!(!cache.contains(&"d"));
            // bucket 1 = [e]; bucket 2 = [b, a]
            cache.get(&"e");
            // bucket 2 = [b, a, e]
            cache.put("f", 6);
            assert!(!cache.contains(&"b"));
            assert!(cache.contains(&"a"));
            assert!(cache.contains(&"e"));
        }

        #[test]
        fn peek_lfu_names_next_victim() {
            let mut cache = LfuCache::new(2);
            assert_eq!(cache.peek_lfu(), None);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.get(&1);
            assert_eq!(cache.peek_lfu(), Some((&2, &"two")));
            assert_eq!(cache.frequency(&2), Some(1));

            cache.put(3, "three");
            assert!(!cache.contains(&2));
        }
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn zero_capacity_stores_nothing() {
            let mut cache = LfuCache::new(0);
            assert_eq!(cache.put(1, 1), None);
            assert_eq!(cache.put(1, 2), None);
            assert_eq!(cache.get(&1), None);
            assert!(cache.is_empty());
            assert_eq!(cache.min_frequency(), None);
            assert_eq!(cache.get_or_insert_with(1, || unreachable!()), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn get_on_empty_cache_changes_nothing() {
            let mut cache: LfuCache<u32, u32> = LfuCache::new(4);
            assert_eq!(cache.get(&7), None);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.min_frequency(), None);
            assert_eq!(cache.freq.bucket_count(), 0);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn try_new_rejects_negative_capacity() {
            let err = LfuCache::<u32, u32>::try_new(-1).unwrap_err();
            assert!(err.message().contains("non-negative"));
            assert!(LfuCache::<u32, u32>::try_new(i64::MIN).is_err());
            assert_eq!(LfuCache::<u32, u32>::try_new(0).unwrap().capacity(), 0);
            assert_eq!(LfuCache::<u32, u32>::try_new(5).unwrap().capacity(), 5);
        }

        #[test]
        fn huge_capacity_does_not_preallocate() {
            let mut cache = LfuCache::new(usize::MAX);
            cache.put(1u8, 1u8);
            assert_eq!(cache.capacity(), usize::MAX);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn contains_and_peek_do_not_promote() {
            let mut cache = LfuCache::new(2);
            cache.put("a", 1);
            assert!(cache.contains(&"a"));
            assert_eq!(cache.peek(&"a"), Some(&1));
            assert_eq!(cache.frequency(&"a"), Some(1));
        }

        #[test]
        fn get_or_insert_with_evicts_when_full() {
            let mut cache = LfuCache::new(1);
            assert_eq!(cache.get_or_insert_with("x", || 1), Some(&1));
            assert_eq!(cache.get_or_insert_with("y", || 2), Some(&2));
            assert!(!cache.contains(&"x"));
            assert_eq!(cache.frequency(&"y"), Some(1));
        }

        #[test]
        fn extend_puts_every_pair() {
            let mut cache = LfuCache::new(4);
            cache.extend([(1, 'a'), (2, 'b'), (1, 'c')]);
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.peek(&1), Some(&'c'));
            assert_eq!(cache.frequency(&1), Some(2));

            let mut seen: Vec<_> = cache.iter().map(|(k, v, f)| (*k, *v, f)).collect();
            seen.sort();
            assert_eq!(seen, [(1, 'c', 2), (2, 'b', 1)]);
        }

        #[test]
        fn debug_output_is_summary() {
            let mut cache = LfuCache::new(3);
            cache.put(1, vec![0u8; 1024]);
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("LfuCache"));
            assert!(dbg.contains("capacity: 3"));
        }

        #[test]
        fn cache_is_send() {
            fn assert_send<T: Send>() {}
            assert_send::<LfuCache<String, Vec<u8>>>();
        }
    }
}
