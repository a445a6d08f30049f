//! Memoizing an expensive function behind a shared LFU cache.
//!
//! Run with `RUST_LOG=freqcache=trace` to watch evictions. An optional first
//! argument sets the capacity; a negative value is reported as a config error.

use std::thread;

use freqcache::builder::LfuCacheBuilder;
use tracing_subscriber::EnvFilter;

fn collatz_len(mut n: u64) -> u64 {
    let mut steps = 0;
    while n != 1 {
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    steps
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let capacity: i64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 32,
    };
    let cache = LfuCacheBuilder::from_signed(capacity).try_build_concurrent::<u64, u64>()?;

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                let mut total = 0;
                for i in 0..1_000u64 {
                    // small shared hot set, plus a cold tail unique to each thread
                    let n = if i % 4 == 0 { 1_000 + t * 1_000 + i } else { 1 + i % 24 };
                    total += cache.get_or_insert_with(n, || collatz_len(n)).unwrap_or(0);
                }
                total
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let total = handle.join().map_err(|_| "worker panicked")?;
        println!("thread {t}: summed {total} steps");
    }
    println!("cached entries: {} / {}", cache.len(), cache.capacity());
    Ok(())
}
