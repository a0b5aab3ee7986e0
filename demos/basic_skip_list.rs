//! Example demonstrating the skip list with natural and custom ordering.
//!
//! Run with: cargo run --example basic_skip_list

use std::cmp::Ordering;

use ordcache::ds::skip_list::{CoinFlip, SkipList};

fn by_length_then_alpha(a: &&str, b: &&str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn main() {
    println!("=== Skip List Example ===\n");

    let mut scores = SkipList::new();
    scores.set(42, "answer").set(7, "lucky").set(13, "unlucky").set(1, "first");
    println!("Ascending: {:?}", scores.iter().collect::<Vec<_>>());
    println!("first = {:?}, last = {:?}", scores.first(), scores.last());
    println!("levels: {} of {}", scores.level(), scores.max_level());

    scores.insert(7, "still lucky");
    scores.delete(&13);
    println!("After update and delete: {scores:?}");

    println!("\n=== Custom Comparator ===\n");

    // Seeded levels give the same shape on every run.
    let mut words = SkipList::with_parts(by_length_then_alpha, 64, CoinFlip::seeded(1));
    for word in ["pear", "fig", "banana", "kiwi", "apple"] {
        words.insert(word, word.len());
    }
    println!("By length: {:?}", words.keys().collect::<Vec<_>>());
}
