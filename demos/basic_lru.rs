//! Example demonstrating the LRU (Least Recently Used) cache policy and the
//! trim ratio.
//!
//! Run with: cargo run --example basic_lru

use ordcache::builder::{CacheBuilder, EvictionPolicy};
use ordcache::policy::lru::LruCache;

fn main() {
    println!("=== LRU Cache Example ===\n");

    let mut cache = LruCache::with_limit(3);
    cache.set("a", 1).set("b", 2).set("c", 3);
    println!("Inserted a, b, c: {:?}", cache.keys().collect::<Vec<_>>());

    // Reads count as use.
    cache.get(&"a");
    println!("Read a:           {:?}", cache.keys().collect::<Vec<_>>());

    cache.set("d", 4);
    println!("Inserted d:       {:?} (b was least recent)", cache.keys().collect::<Vec<_>>());

    // Peeking leaves the order alone.
    cache.peek(&"c");
    println!("Peeked c:         {:?}", cache.keys().collect::<Vec<_>>());

    println!("\n=== Trim Ratio ===\n");

    // With ratio 0.5 an overflow trims to half the limit, so the next few
    // inserts are free.
    let mut batchy = LruCache::new(8, 0.5);
    for i in 0..9 {
        batchy.insert(i, i);
        println!("  insert {i}: len {}", batchy.len());
    }

    println!("\n=== Runtime Policy ===\n");

    let policy: EvictionPolicy = "lru".parse().unwrap_or(EvictionPolicy::Lru);
    let mut dynamic = CacheBuilder::new(2).ratio(1.0).build::<u32, &str>(policy);
    dynamic.set(1, "one").set(2, "two").set(3, "three");
    println!("  {policy} cache holds {:?}", dynamic.keys().collect::<Vec<_>>());
}
