#![no_main]

use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary get/put sequences on LfuCache
//
// The first byte picks the capacity; the rest is read as (op, key, value)
// triples. Invariants are checked after every operation.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, ops)) = data.split_first() else {
        return;
    };
    let mut cache: LfuCache<u8, u8> = LfuCache::new(usize::from(cap % 16));

    for chunk in ops.chunks_exact(3) {
        let (op, key, value) = (chunk[0] % 4, chunk[1] % 32, chunk[2]);
        match op {
            0 => {
                let before = cache.frequency(&key);
                let hit = cache.get(&key).copied();
                assert_eq!(hit.is_some(), before.is_some());
                if let Some(freq) = before {
                    assert_eq!(cache.frequency(&key), Some(freq + 1));
                }
            }
            1 => {
                let was_full = cache.len() == cache.capacity();
                let present = cache.contains(&key);
                let victim = cache.peek_lfu().map(|(k, _)| *k);
                cache.put(key, value);
                if cache.capacity() > 0 {
                    assert_eq!(cache.peek(&key), Some(&value));
                }
                if was_full && !present {
                    if let Some(victim) = victim {
                        assert!(!cache.contains(&victim));
                    }
                }
            }
            2 => {
                let _ = cache.get_or_insert_with(key, || value);
            }
            3 => {
                let _ = cache.peek_lfu();
                let _ = cache.min_frequency();
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= cache.capacity());
        cache.check_invariants().unwrap();
    }
});
