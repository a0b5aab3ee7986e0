//! Example demonstrating the MRU (Most Recently Used) cache policy.
//!
//! MRU evicts the **most** recently used entries when the cache overflows.
//! It suits cyclic scans over a working set larger than the cache.
//!
//! Run with: cargo run --example basic_mru

use ordcache::policy::mru::MruCache;

fn main() {
    println!("=== MRU Cache Example ===\n");

    let mut cache = MruCache::with_limit(5);
    println!("Created MRU cache: limit={}\n", cache.limit());

    for i in 1..=5 {
        cache.insert(i, format!("value-{i}"));
    }
    println!("Inserted keys 1-5");
    println!("  len: {}", cache.len());

    // Reading key 2 makes it the most recent entry.
    cache.get(&2);
    println!("\nAccessed key 2 (now most recent)");

    // Key 6 is new and the cache is full: the most recent entry goes first.
    cache.insert(6, "value-6".to_string());
    println!("Inserted key 6");

    println!("\nAfter inserting key 6:");
    println!("  contains 2? {} (was most recent, evicted)", cache.contains(&2));
    println!("  contains 1? {} (oldest, kept)", cache.contains(&1));
    println!("  contains 6? {} (newly inserted)", cache.contains(&6));
    println!("  order (least -> most recent): {:?}", cache.keys().collect::<Vec<_>>());

    println!("\n=== Cyclic Scan ===\n");

    // Scan keys 0..8 three times through a cache of 5. LRU would miss on
    // every access; MRU keeps most of the loop resident.
    let mut scan = MruCache::with_limit(5);
    let mut hits = 0;
    let mut accesses = 0;
    for _ in 0..3 {
        for key in 0..8 {
            accesses += 1;
            if scan.get(&key).is_some() {
                hits += 1;
            } else {
                scan.insert(key, key * key);
            }
        }
    }
    println!("  {hits} hits out of {accesses} accesses");
}
