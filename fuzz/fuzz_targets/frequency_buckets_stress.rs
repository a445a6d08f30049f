#![no_main]

use std::collections::HashMap;

use freqcache::ds::FrequencyBuckets;
use libfuzzer_sys::fuzz_target;

// Fuzz stress test with heavy insert, touch and pop_min traffic
//
// Mirrors every operation in a plain HashMap so frequencies and eviction
// results can be cross-checked.
fuzz_target!(|data: &[u8]| {
    let mut buckets: FrequencyBuckets<u32> = FrequencyBuckets::new();
    let mut reference: HashMap<u32, u64> = HashMap::new();

    for chunk in data.chunks_exact(2) {
        let key = u32::from(chunk[1]);
        match chunk[0] % 3 {
            0 => {
                if buckets.insert(key) {
                    reference.insert(key, 1);
                }
            }
            1 => {
                if let Some(new_freq) = buckets.touch(&key) {
                    *reference.get_mut(&key).unwrap() = new_freq;
                }
            }
            2 => {
                if let Some((evicted_key, evicted_freq)) = buckets.pop_min() {
                    assert_eq!(reference.remove(&evicted_key), Some(evicted_freq));
                    assert!(reference.values().all(|&f| f >= evicted_freq));
                }
            }
            _ => unreachable!(),
        }

        buckets.check_invariants().unwrap();
        assert_eq!(buckets.len(), reference.len());
        assert_eq!(buckets.min_freq(), reference.values().copied().min());
        for (key, expected) in &reference {
            assert_eq!(buckets.frequency(key), Some(*expected));
        }
    }
});
