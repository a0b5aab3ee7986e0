//! Comparator-ordered map built as a skip list (Pugh, 1990).
//!
//! ## Architecture
//!
//! ```text
//!   level 3  head ───────────────────────────► [8] ──► None
//!   level 2  head ─────────────► [3] ────────► [8] ──► None
//!   level 1  head ──► [1] ─────► [3] ──► [5] ► [8] ──► None
//!   level 0  head ──► [1] ─────► [3] ──► [5] ► [8] ──► None
//!
//!   nodes: SlotArena<SkipNode { key, value, forward: Vec<Option<SlotId>> }>
//!   head:  Vec<Option<SlotId>>   (one forward slot per possible level)
//! ```
//!
//! Every chain is strictly increasing under the comparator, and a node that
//! appears on level `i` appears on every level below it. Search starts on the
//! highest occupied level, runs forward while the next key is smaller, and
//! drops a level when blocked. Insert and delete record the last node visited
//! on each level (the update array) and rewire exactly those forward slots.
//!
//! ## Levels
//!
//! `max_level = max(1, floor(log2(capacity_hint)))`. A new node's height comes
//! from a [`LevelGenerator`]; the default [`CoinFlip`] promotes with
//! probability 0.5, so `P(height >= k) = 0.5^(k-1)`. Inject
//! [`CoinFlip::seeded`] or your own generator to get reproducible shapes.
//! After a delete the list level shrinks while its top header slot is empty.
//!
//! ## Operations
//!
//! | Operation                   | Expected time |
//! |-----------------------------|---------------|
//! | `get` / `contains`          | O(log n)      |
//! | `insert` / `remove`         | O(log n)      |
//! | `first` / `pop_first`       | O(1)          |
//! | `last`                      | O(log n)      |
//! | `iter` / `keys` / `values`  | O(n)          |
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::ds::SkipList;
//!
//! let mut list = SkipList::new();
//! list.set(5, "five").set(3, "three").set(8, "eight").set(1, "one");
//! list.delete(&3);
//! assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec![1, 5, 8]);
//!
//! // Descending order through a custom comparator.
//! let mut desc = SkipList::with_comparator(|a: &i32, b: &i32| b.cmp(a));
//! desc.set(1, ()).set(2, ()).set(3, ());
//! assert_eq!(desc.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::trace;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ds::slot_arena::{SlotArena, SlotId};

/// Capacity hint used by [`SkipList::new`]; gives 16 levels.
pub const DEFAULT_CAPACITY_HINT: usize = 1 << 16;

/// Promotion probability used by [`CoinFlip`] unless overridden.
pub const DEFAULT_PROMOTION_PROBABILITY: f64 = 0.5;

/// Natural-order comparator type used when `K: Ord`.
pub type OrdFn<K> = fn(&K, &K) -> Ordering;

/// Source of node heights.
pub trait LevelGenerator {
    /// Returns a height in `1..=max_level`.
    fn random_level(&mut self, max_level: usize) -> usize;
}

/// Geometric level generator: keeps promoting while a biased coin comes up
/// heads, capped at `max_level`.
#[derive(Debug, Clone)]
pub struct CoinFlip<R = SmallRng> {
    rng: R,
    probability: f64,
}

impl CoinFlip<SmallRng> {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Deterministic generator; the same seed always yields the same heights.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for CoinFlip<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CoinFlip<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng,
            probability: DEFAULT_PROMOTION_PROBABILITY,
        }
    }

    /// Overrides the promotion probability. Values are clamped to `[0, 1]`;
    /// NaN keeps the default.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = if probability.is_nan() {
            DEFAULT_PROMOTION_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl<R: Rng> LevelGenerator for CoinFlip<R> {
    fn random_level(&mut self, max_level: usize) -> usize {
        let mut level = 1;
        while level < max_level && self.rng.random_bool(self.probability) {
            level += 1;
        }
        level
    }
}

/// `max(1, floor(log2(capacity_hint)))`.
pub fn max_level_for(capacity_hint: usize) -> usize {
    if capacity_hint < 2 {
        1
    } else {
        capacity_hint.ilog2() as usize
    }
}

#[derive(Debug, Clone)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    forward: Vec<Option<SlotId>>,
}

/// Ordered map sorted by a caller-supplied comparator.
///
/// `C` is the comparator and `G` the [`LevelGenerator`]. Keys comparing equal
/// under `C` are the same key.
#[derive(Clone)]
pub struct SkipList<K, V, C = OrdFn<K>, G = CoinFlip> {
    arena: SlotArena<SkipNode<K, V>>,
    head: Vec<Option<SlotId>>,
    level: usize,
    max_level: usize,
    cmp: C,
    levels: G,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Natural key order, default capacity hint, OS-seeded levels.
    pub fn new() -> Self {
        Self::with_capacity_hint(DEFAULT_CAPACITY_HINT)
    }

    pub fn with_capacity_hint(capacity_hint: usize) -> Self {
        Self::with_parts(K::cmp as OrdFn<K>, capacity_hint, CoinFlip::new())
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> SkipList<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_parts(cmp, DEFAULT_CAPACITY_HINT, CoinFlip::new())
    }

    pub fn with_comparator_and_hint(cmp: C, capacity_hint: usize) -> Self {
        Self::with_parts(cmp, capacity_hint, CoinFlip::new())
    }
}

impl<K, V, C, G> SkipList<K, V, C, G>
where
    C: Fn(&K, &K) -> Ordering,
    G: LevelGenerator,
{
    /// Fully explicit constructor.
    pub fn with_parts(cmp: C, capacity_hint: usize, levels: G) -> Self {
        let max_level = max_level_for(capacity_hint);
        Self {
            arena: SlotArena::new(),
            head: vec![None; max_level],
            level: 0,
            max_level,
            cmp,
            levels,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Highest occupied level (0 when empty).
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// An update only replaces the value: no node is allocated and no level
    /// changes.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (update, found) = self.find_with_update(&key);
        if let Some(id) = found {
            return self
                .arena
                .get_mut(id)
                .map(|node| std::mem::replace(&mut node.value, value));
        }

        let height = self
            .levels
            .random_level(self.max_level)
            .clamp(1, self.max_level);
        if height > self.level {
            // update[self.level..height] already names the header.
            trace!("skip list level {} -> {}", self.level, height);
            self.level = height;
        }

        let id = self.arena.insert(SkipNode {
            key,
            value,
            forward: vec![None; height],
        });
        for (lvl, &pred) in update.iter().enumerate().take(height) {
            let succ = self.next_at(pred, lvl);
            if let Some(node) = self.arena.get_mut(id) {
                node.forward[lvl] = succ;
            }
            self.set_next_at(pred, lvl, Some(id));
        }
        None
    }

    /// Chainable form of [`insert`](Self::insert).
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (update, found) = self.find_with_update(key);
        let target = found?;
        let height = self.arena.get(target)?.forward.len();

        for (lvl, &pred) in update.iter().enumerate().take(height.min(self.level)) {
            if self.next_at(pred, lvl) != Some(target) {
                break;
            }
            let succ = self.next_at(Some(target), lvl);
            self.set_next_at(pred, lvl, succ);
        }

        let node = self.arena.remove(target)?;
        self.shrink_level();
        Some((node.key, node.value))
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.head[0]
            .and_then(|id| self.arena.get(id))
            .map(|node| (&node.key, &node.value))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut current = None;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.next_at(current, lvl) {
                current = Some(next);
            }
        }
        current
            .and_then(|id| self.arena.get(id))
            .map(|node| (&node.key, &node.value))
    }

    /// Removes the smallest entry. Its predecessor on every level is the
    /// header, so no search is needed.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.head[0]?;
        let node = self.arena.remove(id)?;
        for (lvl, succ) in node.forward.iter().enumerate() {
            if self.head[lvl] == Some(id) {
                self.head[lvl] = *succ;
            }
        }
        self.shrink_level();
        Some((node.key, node.value))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.iter_mut().for_each(|slot| *slot = None);
        self.level = 0;
    }

    /// Entries in ascending comparator order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            current: self.head[0],
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (key, value) in self.iter() {
            f(key, value);
        }
    }

    fn find(&self, key: &K) -> Option<SlotId> {
        let mut current = None;
        for lvl in (0..self.level).rev() {
            current = self.advance(current, lvl, key);
        }
        self.next_at(current, 0).filter(|&id| self.key_is(id, key))
    }

    /// Search that also returns the per-level predecessors. `None` entries in
    /// the update array stand for the header.
    fn find_with_update(&self, key: &K) -> (Vec<Option<SlotId>>, Option<SlotId>) {
        let mut update = vec![None; self.max_level];
        let mut current = None;
        for lvl in (0..self.level).rev() {
            current = self.advance(current, lvl, key);
            update[lvl] = current;
        }
        let found = self.next_at(current, 0).filter(|&id| self.key_is(id, key));
        (update, found)
    }

    /// Moves right on `lvl` while the next key is smaller than `key`.
    fn advance(&self, mut current: Option<SlotId>, lvl: usize, key: &K) -> Option<SlotId> {
        while let Some(next) = self.next_at(current, lvl) {
            match self.arena.get(next) {
                Some(node) if (self.cmp)(&node.key, key) == Ordering::Less => {
                    current = Some(next)
                },
                _ => break,
            }
        }
        current
    }

    fn key_is(&self, id: SlotId, key: &K) -> bool {
        self.arena
            .get(id)
            .is_some_and(|node| (self.cmp)(&node.key, key) == Ordering::Equal)
    }

    fn next_at(&self, at: Option<SlotId>, lvl: usize) -> Option<SlotId> {
        match at {
            None => self.head[lvl],
            Some(id) => self
                .arena
                .get(id)
                .and_then(|node| node.forward.get(lvl).copied().flatten()),
        }
    }

    fn set_next_at(&mut self, at: Option<SlotId>, lvl: usize, to: Option<SlotId>) {
        match at {
            None => self.head[lvl] = to,
            Some(id) => {
                if let Some(slot) = self
                    .arena
                    .get_mut(id)
                    .and_then(|node| node.forward.get_mut(lvl))
                {
                    *slot = to;
                }
            },
        }
    }

    fn shrink_level(&mut self) {
        let before = self.level;
        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            trace!("skip list level {} -> {}", before, self.level);
        }
    }

    /// Checks ordering and leveling on every level; panics on violation.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.level <= self.max_level);
        for lvl in self.level..self.max_level {
            assert!(self.head[lvl].is_none(), "header slot above level is set");
        }
        if self.level > 0 {
            assert!(self.head[self.level - 1].is_some(), "top level is empty");
        }

        let mut bottom = std::collections::HashSet::new();
        let mut current = self.head[0];
        let mut prev: Option<&K> = None;
        while let Some(id) = current {
            let node = self.arena.get(id).expect("linked slot is vacant");
            if let Some(prev_key) = prev {
                assert_eq!((self.cmp)(prev_key, &node.key), Ordering::Less);
            }
            assert!(bottom.insert(id), "cycle on level 0");
            prev = Some(&node.key);
            current = node.forward[0];
        }
        assert_eq!(bottom.len(), self.len());

        for lvl in 1..self.level {
            let mut current = self.head[lvl];
            let mut prev: Option<&K> = None;
            while let Some(id) = current {
                assert!(bottom.contains(&id), "node on level {lvl} missing below");
                let node = self.arena.get(id).expect("linked slot is vacant");
                assert!(node.forward.len() > lvl);
                if let Some(prev_key) = prev {
                    assert_eq!((self.cmp)(prev_key, &node.key), Ordering::Less);
                }
                prev = Some(&node.key);
                current = node.forward[lvl];
            }
        }
    }
}

impl<K, V, C, G> fmt::Debug for SkipList<K, V, C, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = Iter {
            arena: &self.arena,
            current: self.head[0],
            remaining: self.arena.len(),
        };
        f.debug_map().entries(entries).finish()
    }
}

impl<K, V, C, G> Extend<(K, V)> for SkipList<K, V, C, G>
where
    C: Fn(&K, &K) -> Ordering,
    G: LevelGenerator,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

/// Ascending iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    arena: &'a SlotArena<SkipNode<K, V>>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.current?)?;
        self.current = node.forward[0];
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
