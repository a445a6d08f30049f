//! Frequency buckets for O(1) LFU tracking.
//!
//! Tracks how often each key has been used and in which order keys entered
//! their current frequency level. Insert, touch and evict are all O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                       FrequencyBuckets<K> Layout                         │
//! │                                                                          │
//! │   index: FxHashMap<K, SlotId>        entries: SlotArena<Entry<K>>        │
//! │   ┌───────────┬────────┐             ┌──────┬─────────────────────┐      │
//! │   │  "page_a" │  id_0  │────────────►│ id_0 │ freq:2, prev/next   │      │
//! │   │  "page_b" │  id_1  │────────────►│ id_1 │ freq:1, prev/next   │      │
//! │   │  "page_c" │  id_2  │────────────►│ id_2 │ freq:1, prev/next   │      │
//! │   └───────────┴────────┘             └──────┴─────────────────────┘      │
//! │                                                                          │
//! │   buckets: FxHashMap<u64, Bucket>   (frequency → doubly linked list)     │
//! │                                                                          │
//! │   min_freq = 1                                                           │
//! │     freq=1: head ──► [id_1] ◄──► [id_2] ◄── tail                         │
//! │                      oldest       newest                                 │
//! │     freq=2: head ──► [id_0] ◄── tail                                     │
//! │                                                                          │
//! │   bucket links: freq=1 ──next──► freq=2, freq=2 ──prev──► freq=1         │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Touch flow:
//!
//! 1. Look up the slot in `index`
//! 2. Unlink it from bucket `f`
//! 3. If bucket `f` is now empty, drop it; if it was the minimum, the minimum
//!    becomes `f + 1`
//! 4. Append the slot at the tail of bucket `f + 1`, creating the bucket
//!
//! Eviction flow (`pop_min`): take the head of the `min_freq` bucket, drop the
//! bucket if it empties and follow its `next` link to the new minimum.
//!
//! ## Operations
//!
//! | Operation      | Time | Notes                                      |
//! |----------------|------|--------------------------------------------|
//! | `insert`       | O(1) | New key starts at freq=1, newest position   |
//! | `touch`        | O(1) | freq += 1, newest position in new bucket    |
//! | `pop_min`      | O(1) | Oldest key of the lowest frequency          |
//! | `peek_min`     | O(1) | Same candidate, not removed                 |
//! | `frequency`    | O(1) | Current frequency of a key                  |
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::ds::FrequencyBuckets;
//!
//! let mut freq = FrequencyBuckets::new();
//! freq.insert("page_a");
//! freq.insert("page_b");
//! freq.insert("page_c");
//!
//! freq.touch(&"page_a"); // freq=2
//!
//! // Lowest frequency, oldest first
//! assert_eq!(freq.pop_min(), Some(("page_b", 1)));
//! assert_eq!(freq.pop_min(), Some(("page_c", 1)));
//! assert_eq!(freq.pop_min(), Some(("page_a", 2)));
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Default bucket pre-allocation. Most keys sit at low frequencies, so 32
/// distinct levels covers typical workloads without rehashing.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

#[derive(Debug)]
struct Entry<K> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    // Neighbouring non-empty frequencies.
    prev: Option<u64>,
    next: Option<u64>,
}

/// O(1) LFU metadata tracker with FIFO tie-breaking within a frequency.
///
/// # Example
///
/// ```
/// use freqcache::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert("a");
/// freq.insert("b");
/// freq.touch(&"a");
///
/// assert_eq!(freq.frequency(&"a"), Some(2));
/// assert_eq!(freq.frequency(&"b"), Some(1));
/// assert_eq!(freq.min_freq(), Some(1));
/// assert_eq!(freq.peek_min(), Some((&"b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    entries: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    // 0 means empty.
    min_freq: u64,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty tracker with room for `capacity` keys and
    /// [`DEFAULT_BUCKET_PREALLOC`] frequency levels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Creates an empty tracker with room for `capacity` keys and
    /// `bucket_hint` distinct frequency levels.
    pub fn with_capacity_and_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::with_capacity_and_hasher(bucket_hint, Default::default()),
            min_freq: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of non-empty frequency levels.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current frequency of `key`.
    #[inline]
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Lowest frequency among tracked keys, `None` when empty.
    #[inline]
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Peeks the eviction candidate: the oldest key of the min-frequency bucket.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        let id = self.buckets.get(&self.min_freq)?.head?;
        let entry = self.entries.get(id)?;
        Some((&entry.key, entry.freq))
    }

    /// Starts tracking `key` at frequency 1 as the newest member of bucket 1.
    ///
    /// Returns `false` (and changes nothing) if the key is already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key: key.clone(),
        });
        self.index.insert(key, id);

        if !self.buckets.contains_key(&1) {
            // Any existing minimum is > 1, so bucket 1 becomes the new lowest level.
            let next = self.min_freq();
            self.insert_bucket(1, None, next);
        }
        self.list_push_back(1, id);
        self.min_freq = 1;
        true
    }

    /// Counts one use of `key`: moves it to the tail of the next bucket.
    ///
    /// Returns the new frequency, or `None` if the key is not tracked. At
    /// `u64::MAX` the frequency saturates and the key is only re-queued as
    /// the newest member of its bucket.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = self.entries.get(id)?.freq;

        if freq == u64::MAX {
            self.list_unlink(freq, id)?;
            self.list_push_back(freq, id);
            return Some(freq);
        }
        let next_freq = freq + 1;

        let (prev_level, next_level) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        self.list_unlink(freq, id)?;
        let emptied = self.bucket_is_empty(freq);
        if emptied {
            self.remove_bucket(freq, prev_level, next_level);
            // Frequencies only ever step by one, so the minimum can only rise
            // to the level this key is about to occupy.
            if self.min_freq == freq {
                self.min_freq = next_freq;
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if emptied { prev_level } else { Some(freq) };
            self.insert_bucket(next_freq, prev, next_level);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next_freq;
        }
        self.list_push_back(next_freq, id);

        Some(next_freq)
    }

    /// Removes and returns the eviction candidate `(key, freq)`.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let freq = self.min_freq;
        let (id, next_level) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.head?, bucket.next)
        };

        self.list_unlink(freq, id)?;
        if self.bucket_is_empty(freq) {
            // The minimum bucket has no lower neighbour.
            self.remove_bucket(freq, None, next_level);
            self.min_freq = next_level.unwrap_or(0);
        }

        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.freq))
    }

    /// Keys at frequency `freq`, oldest first.
    pub fn iter_bucket(&self, freq: u64) -> BucketIter<'_, K> {
        BucketIter {
            buckets: self,
            current: self.buckets.get(&freq).and_then(|bucket| bucket.head),
        }
    }

    /// All tracked keys with their frequency, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.index
            .iter()
            .filter_map(|(key, id)| self.entries.get(*id).map(|entry| (key, entry.freq)))
    }

    /// Walks every bucket and checks the structure against the index.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        ensure(
            self.entries.len() == self.index.len(),
            "arena and index disagree on entry count",
        )?;

        if self.is_empty() {
            ensure(self.buckets.is_empty(), "empty tracker still has buckets")?;
            ensure(self.min_freq == 0, "empty tracker has a non-zero min_freq")?;
            return Ok(());
        }

        ensure(self.min_freq > 0, "non-empty tracker has min_freq 0")?;
        ensure(
            self.buckets.contains_key(&self.min_freq),
            "min_freq does not name a live bucket",
        )?;

        let mut seen = 0usize;
        for (&freq, bucket) in &self.buckets {
            ensure(freq >= self.min_freq, "bucket below min_freq")?;
            ensure(bucket.head.is_some(), "empty bucket left in place")?;
            match bucket.prev {
                Some(prev) => {
                    let linked = self.buckets.get(&prev).and_then(|b| b.next);
                    ensure(prev < freq, "bucket prev link is not lower")?;
                    ensure(linked == Some(freq), "bucket prev/next links disagree")?;
                },
                None => ensure(self.min_freq == freq, "unlinked bucket is not the minimum")?,
            }
            if let Some(next) = bucket.next {
                let linked = self.buckets.get(&next).and_then(|b| b.prev);
                ensure(next > freq, "bucket next link is not higher")?;
                ensure(linked == Some(freq), "bucket next/prev links disagree")?;
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| InvariantError::new("bucket points at vacant slot"))?;
                ensure(entry.freq == freq, "entry sits in the wrong bucket")?;
                ensure(entry.prev == last, "entry prev link broken")?;
                ensure(
                    self.index.get(&entry.key) == Some(&id),
                    "index does not point back at entry",
                )?;
                last = Some(id);
                current = entry.next;
                seen += 1;
            }
            ensure(bucket.tail == last, "bucket tail does not match last entry")?;
        }
        ensure(seen == self.index.len(), "buckets do not cover every key")
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .is_none_or(|bucket| bucket.head.is_none())
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = next;
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn list_push_back(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };
        let old_tail = bucket.tail.replace(id);
        if old_tail.is_none() {
            bucket.head = Some(id);
        }
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = old_tail;
            entry.next = None;
        }
        if let Some(tail) = old_tail
            && let Some(entry) = self.entries.get_mut(tail)
        {
            entry.next = Some(id);
        }
    }

    fn list_unlink(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let entry = self.entries.get(id)?;
            (entry.prev, entry.next)
        };
        let bucket = self.buckets.get_mut(&freq)?;

        match prev {
            Some(prev) => {
                if let Some(entry) = self.entries.get_mut(prev) {
                    entry.next = next;
                }
            },
            None => bucket.head = next,
        }
        match next {
            Some(next) => {
                if let Some(entry) = self.entries.get_mut(next) {
                    entry.prev = prev;
                }
            },
            None => bucket.tail = prev,
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
        Some(())
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the keys of one frequency bucket, oldest first.
///
/// Created by [`FrequencyBuckets::iter_bucket`].
pub struct BucketIter<'a, K> {
    buckets: &'a FrequencyBuckets<K>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for BucketIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.buckets.entries.get(self.current?)?;
        self.current = entry.next;
        Some(&entry.key)
    }
}

#[inline]
fn ensure(cond: bool, msg: &str) -> Result<(), InvariantError> {
    if cond {
        Ok(())
    } else {
        Err(InvariantError::new(msg))
    }
}
