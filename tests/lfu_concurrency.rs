// ==============================================
// LFU CONCURRENCY TESTS (integration)
// ==============================================
#![cfg(feature = "concurrency")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use freqcache::policy::lfu::ConcurrentLfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait};

#[test]
fn parallel_puts_respect_capacity() {
    let cache: ConcurrentLfuCache<String, usize> = ConcurrentLfuCache::new(100);
    let num_threads = 8;
    let per_thread = 250;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    cache.put(format!("thread_{}_{}", thread_id, i), i);
                    assert!(cache.len() <= cache.capacity());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 100);
    assert!(cache.with_lock(|c| c.check_invariants()).is_ok());
}

#[test]
fn every_get_counts_exactly_once() {
    let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(4);
    cache.put(7, 70);
    let num_threads = 8;
    let per_thread = 500;
    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let cache = cache.clone();
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for _ in 0..per_thread {
                    if cache.get(&7) == Some(70) {
                        hits.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (num_threads * per_thread) as u64;
    assert_eq!(hits.load(Ordering::Relaxed) as u64, total);
    assert_eq!(cache.frequency(&7), Some(1 + total));
}

#[test]
fn hot_key_survives_concurrent_churn() {
    let cache: ConcurrentLfuCache<u64, u64> = ConcurrentLfuCache::new(8);
    cache.put(0, 0);
    for _ in 0..10 {
        cache.get(&0);
    }

    let handles: Vec<_> = (1..=4u64)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    cache.put(t * 1_000 + i, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.contains(&0));
    assert_eq!(cache.peek(&0), Some(0));
    assert_eq!(cache.with_lock(|c| c.min_frequency()), Some(1));
}

#[test]
fn with_lock_sequences_are_atomic() {
    let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(1);
    cache.put(1, 0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    cache.with_lock(|c| {
                        let next = c.peek(&1).copied().unwrap_or(0) + 1;
                        c.put(1, next);
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.peek(&1), Some(1000));
}
