//! Insertion-ordered hash map with O(1) relocation ("touch").
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        OrderedMap<K, V> Layout                       │
//! │                                                                      │
//! │   index: FxHashMap<K, SlotId>        list: IntrusiveList<Entry<K,V>> │
//! │                                                                      │
//! │   ┌─────────┬────────┐               head (oldest)     tail (newest) │
//! │   │  "a"    │ id_0   │──────┐          │                       │     │
//! │   │  "b"    │ id_1   │──────┼──┐       ▼                       ▼     │
//! │   │  "c"    │ id_2   │───┐  │  │     [id_0: a] ◄──► [id_2: c] ◄──► [id_1: b]
//! │   └─────────┴────────┘   │  │  │                                     │
//! │                          └──┴──┴── same slots, never copied          │
//! │                                                                      │
//! │   generation: u64  (bumped on every structural change)               │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Touch
//!
//! [`Touch::AsOld`] relocates an entry to the head ("oldest / first"),
//! [`Touch::AsNew`] to the tail ("newest / last"). Relocation re-links the
//! existing slot, so the index entry stays valid. Relocating an entry that is
//! already at the requested end does nothing.
//!
//! ## Generation
//!
//! Inserts, removals, relocations, trims and `clear` bump the generation.
//! Overwriting the value of an existing key without relocating it does not.
//! A [`Cursor`] remembers the generation it was created at and refuses to
//! continue once it changes, which turns "mutated while iterating" into a
//! reported [`MapError::IterationInvalidated`] instead of a silently skipped or
//! repeated entry. The borrowing iterators ([`OrderedMap::iter`] and friends)
//! don't need the check: the borrow checker already rules out mutation while
//! they are alive.
//!
//! ## Operations
//!
//! | Operation          | Time   | Notes                                   |
//! |--------------------|--------|-----------------------------------------|
//! | `get` / `contains` | O(1)   | No relocation                           |
//! | `get_touch`        | O(1)   | Relocates per `Touch`                   |
//! | `insert` / `set`   | O(1)*  | *Amortized (index and arena growth)     |
//! | `remove` / `shift` | O(1)   |                                         |
//! | `trim_old/new`     | O(k)   | k = entries evicted                     |
//! | `iter` / `cursor`  | O(n)   | Head to tail                            |
//!
//! ## Example Usage
//!
//! ```
//! use ordcache::ds::{OrderedMap, Touch};
//!
//! let mut map = OrderedMap::new();
//! map.set("a", 1, Touch::None)
//!     .set("b", 2, Touch::None)
//!     .set("c", 3, Touch::None);
//!
//! // Reading "a" as new moves it behind "c".
//! assert_eq!(map.get_touch(&"a", Touch::AsNew), Some(&1));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b", "c", "a"]);
//!
//! // FIFO dequeue from the head.
//! assert_eq!(map.shift().unwrap(), Some(("b", 2)));
//! ```

use std::fmt;
use std::hash::Hash;

use log::trace;
use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::{self, IntrusiveList};
use crate::ds::slot_arena::SlotId;
use crate::error::{InvariantError, MapError};

/// Where an entry should end up after an access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Touch {
    /// Leave the entry where it is. New keys are appended at the tail.
    #[default]
    None,
    /// Move to the head, the "oldest" end.
    AsOld,
    /// Move to the tail, the "newest" end.
    AsNew,
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Hash map that remembers a caller-controlled order of its entries.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    generation: u64,
}

impl<K, V> OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            list: IntrusiveList::new(),
            generation: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            generation: 0,
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

    /// Current structural generation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` without relocating it.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns the value for `key`, relocating it first as `touch` requests.
    pub fn get_touch(&mut self, key: &K, touch: Touch) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.relocate(id, touch);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Mutable access to a value. Never relocates and never bumps the
    /// generation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Relocates an existing entry. Returns `false` if `key` is absent.
    pub fn touch(&mut self, key: &K, touch: Touch) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                self.relocate(id, touch);
                true
            },
            None => false,
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// A new key is linked at the tail, or at the head for [`Touch::AsOld`].
    /// An existing key keeps its position unless `touch` asks otherwise.
    pub fn insert(&mut self, key: K, value: V, touch: Touch) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let old = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.relocate(id, touch);
            return old;
        }

        let entry = Entry {
            key: key.clone(),
            value,
        };
        let id = match touch {
            Touch::AsOld => self.list.push_front(entry),
            Touch::None | Touch::AsNew => self.list.push_back(entry),
        };
        self.index.insert(key, id);
        self.bump();
        None
    }

    /// Chainable form of [`insert`](Self::insert).
    pub fn set(&mut self, key: K, value: V, touch: Touch) -> &mut Self {
        self.insert(key, value, touch);
        self
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;
        self.bump();
        Some((entry.key, entry.value))
    }

    /// Removes and returns the head (oldest) entry.
    ///
    /// Fails with [`MapError::Invariant`] if head and tail disagree about
    /// whether the map is empty, or the head's key is missing from the index.
    pub fn shift(&mut self) -> Result<Option<(K, V)>, MapError> {
        match (self.list.front_id(), self.list.back_id()) {
            (None, None) => return Ok(None),
            (Some(_), Some(_)) => {},
            (head, tail) => {
                return Err(InvariantError::new(format!(
                    "head is {} but tail is {}",
                    presence(head),
                    presence(tail)
                ))
                .into());
            },
        }

        let entry = self
            .list
            .pop_front()
            .ok_or_else(|| InvariantError::new("head slot is vacant"))?;
        self.bump();
        if self.index.remove(&entry.key).is_none() {
            return Err(InvariantError::new("head key missing from index").into());
        }
        Ok(Some((entry.key, entry.value)))
    }

    /// Removes and returns the tail (newest) entry.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        self.bump();
        Some((entry.key, entry.value))
    }

    /// Head (oldest) entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.list.front().map(|entry| (&entry.key, &entry.value))
    }

    /// Tail (newest) entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
        self.bump();
    }

    pub fn shrink_to_fit(&mut self) {
        self.index.shrink_to_fit();
        self.list.shrink_to_fit();
    }

    /// Evicts from the head (oldest end) until `len() == new_len`.
    ///
    /// `new_len >= len()` is a no-op. Returns the number of evicted entries.
    /// Eviction policies build on this and [`trim_new`](Self::trim_new).
    pub fn trim_old(&mut self, new_len: usize) -> usize {
        self.trim_with(new_len, IntrusiveList::pop_front)
    }

    /// Evicts from the tail (newest end) until `len() == new_len`.
    pub fn trim_new(&mut self, new_len: usize) -> usize {
        self.trim_with(new_len, IntrusiveList::pop_back)
    }

    fn trim_with(
        &mut self,
        new_len: usize,
        mut pop: impl FnMut(&mut IntrusiveList<Entry<K, V>>) -> Option<Entry<K, V>>,
    ) -> usize {
        let before = self.len();
        if new_len >= before {
            return 0;
        }
        if new_len == 0 {
            self.clear();
        } else {
            while self.len() > new_len {
                let Some(entry) = pop(&mut self.list) else {
                    break;
                };
                self.index.remove(&entry.key);
            }
            self.bump();
        }
        let evicted = before - self.len();
        trace!("trimmed {evicted} entries ({before} -> {new_len})");
        evicted
    }

    /// Entries from head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Calls `f` for every entry from head to tail.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (key, value) in self.iter() {
            f(key, value);
        }
    }

    /// Like [`for_each`](Self::for_each) but with mutable values. Overwriting
    /// values is not a structural change.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&K, &mut V)) {
        let mut current = self.list.front_id();
        while let Some(id) = current {
            current = self.list.next_id(id);
            if let Some(entry) = self.list.get_mut(id) {
                f(&entry.key, &mut entry.value);
            }
        }
    }

    /// Starts a generation-checked traversal that does not borrow the map.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            generation: self.generation,
            next: self.list.front_id(),
        }
    }

    /// Snapshot of all entries in list order.
    pub fn to_entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Inserts every pair as newest, so the resulting order ends with `pairs`
    /// in the order given.
    pub fn load_entries<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.insert(key, value, Touch::AsNew);
        }
    }

    fn relocate(&mut self, id: SlotId, touch: Touch) {
        let moved = match touch {
            Touch::None => false,
            Touch::AsOld => self.list.front_id() != Some(id) && self.list.move_to_front(id),
            Touch::AsNew => self.list.back_id() != Some(id) && self.list.move_to_back(id),
        };
        if moved {
            self.bump();
        }
    }

    #[inline]
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Checks list links and index agreement; panics on any mismatch.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        for id in self.list.iter_ids() {
            let entry = self.list.get(id).expect("linked slot is vacant");
            assert_eq!(self.index.get(&entry.key), Some(&id), "index points elsewhere");
        }
    }
}

fn presence(id: Option<SlotId>) -> &'static str {
    if id.is_some() { "set" } else { "unset" }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value, Touch::None);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over `(&K, &V)` from head to tail.
pub struct Iter<'a, K, V> {
    inner: intrusive_list::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Detached head-to-tail traversal of an [`OrderedMap`].
///
/// The cursor holds no borrow, so the caller may mutate the map between steps.
/// Every step compares the map's generation with the one captured by
/// [`OrderedMap::cursor`]; after any structural change the cursor returns
/// [`MapError::IterationInvalidated`] on every further call.
///
/// A cursor must only be advanced against the map that created it. Only the
/// generation is compared, so a different map that happens to share the same
/// generation is walked through the first map's slot ids.
///
/// ```
/// use ordcache::ds::{OrderedMap, Touch};
///
/// let mut map: OrderedMap<u32, u32> = (0..3).map(|i| (i, i)).collect();
/// let mut cursor = map.cursor();
/// while let Some((&key, _)) = cursor.next(&map).unwrap() {
///     // Value overwrites keep the cursor valid.
///     if let Some(v) = map.get_mut(&key) {
///         *v *= 10;
///     }
/// }
/// assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![0, 10, 20]);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    generation: u64,
    next: Option<SlotId>,
}

impl Cursor {
    /// Advances the cursor.
    pub fn next<'m, K, V>(
        &mut self,
        map: &'m OrderedMap<K, V>,
    ) -> Result<Option<(&'m K, &'m V)>, MapError> {
        if map.generation != self.generation {
            return Err(MapError::IterationInvalidated {
                expected: self.generation,
                found: map.generation,
            });
        }
        let Some(id) = self.next else {
            return Ok(None);
        };
        let entry = map
            .list
            .get(id)
            .ok_or_else(|| InvariantError::new("cursor reached a vacant slot"))?;
        self.next = map.list.next_id(id);
        Ok(Some((&entry.key, &entry.value)))
    }

    /// Whether `map` has not changed structurally since the cursor started.
    pub fn is_valid<K, V>(&self, map: &OrderedMap<K, V>) -> bool {
        map.generation == self.generation
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pairs = <Vec<(K, V)> as serde::Deserialize>::deserialize(deserializer)?;
        let mut map = OrderedMap::with_capacity(pairs.len());
        map.load_entries(pairs);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of<K: Clone + Eq + Hash, V>(map: &OrderedMap<K, V>) -> Vec<K> {
        map.keys().cloned().collect()
    }

    fn abc() -> OrderedMap<&'static str, i32> {
        let mut map = OrderedMap::new();
        map.set("a", 1, Touch::None)
            .set("b", 2, Touch::None)
            .set("c", 3, Touch::None);
        map
    }

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn new_map_is_empty() {
            let map: OrderedMap<u32, u32> = OrderedMap::new();
            assert!(map.is_empty());
            assert_eq!(map.len(), 0);
            assert_eq!(map.front(), None);
            assert_eq!(map.back(), None);
            map.debug_validate_invariants();
        }

        #[test]
        fn insertion_order_is_preserved() {
            let map = abc();
            assert_eq!(keys_of(&map), vec!["a", "b", "c"]);
            assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
            map.debug_validate_invariants();
        }

        #[test]
        fn insert_returns_previous_value() {
            let mut map = OrderedMap::new();
            assert_eq!(map.insert("k", 1, Touch::None), None);
            assert_eq!(map.insert("k", 2, Touch::None), Some(1));
            assert_eq!(map.get(&"k"), Some(&2));
            assert_eq!(map.len(), 1);
        }

        #[test]
        fn overwrite_keeps_position() {
            let mut map = abc();
            map.set("a", 10, Touch::None);
            assert_eq!(keys_of(&map), vec!["a", "b", "c"]);
            assert_eq!(map.get(&"a"), Some(&10));
        }

        #[test]
        fn contains_and_missing_get() {
            let map = abc();
            assert!(map.contains(&"b"));
            assert!(!map.contains(&"z"));
            assert_eq!(map.get(&"z"), None);
        }

        #[test]
        fn get_mut_changes_value() {
            let mut map = abc();
            if let Some(v) = map.get_mut(&"b") {
                *v = 20;
            }
            assert_eq!(map.get(&"b"), Some(&20));
            assert_eq!(map.get_mut(&"z"), None);
        }

        #[test]
        fn front_and_back() {
            let map = abc();
            assert_eq!(map.front(), Some((&"a", &1)));
            assert_eq!(map.back(), Some((&"c", &3)));
        }
    }

    // ==============================================
    // Touch
    // ==============================================

    mod touch {
        use super::*;

        #[test]
        fn as_new_moves_to_tail() {
            let mut map = abc();
            assert_eq!(map.get_touch(&"a", Touch::AsNew), Some(&1));
            assert_eq!(keys_of(&map), vec!["b", "c", "a"]);
            map.debug_validate_invariants();
        }

        #[test]
        fn as_old_moves_to_head() {
            let mut map = abc();
            assert_eq!(map.get_touch(&"c", Touch::AsOld), Some(&3));
            assert_eq!(keys_of(&map), vec!["c", "a", "b"]);
            map.debug_validate_invariants();
        }

        #[test]
        fn new_key_as_old_goes_to_head() {
            let mut map = abc();
            map.set("z", 0, Touch::AsOld);
            assert_eq!(keys_of(&map), vec!["z", "a", "b", "c"]);
        }

        #[test]
        fn set_existing_with_touch_relocates() {
            let mut map = abc();
            map.set("b", 22, Touch::AsNew);
            assert_eq!(keys_of(&map), vec!["a", "c", "b"]);
            map.set("b", 23, Touch::AsOld);
            assert_eq!(keys_of(&map), vec!["b", "a", "c"]);
            assert_eq!(map.get(&"b"), Some(&23));
        }

        #[test]
        fn touch_at_target_end_is_noop() {
            let mut map = abc();
            let generation = map.generation();
            map.get_touch(&"c", Touch::AsNew);
            map.get_touch(&"a", Touch::AsOld);
            assert_eq!(map.generation(), generation);
            assert_eq!(keys_of(&map), vec!["a", "b", "c"]);
        }

        #[test]
        fn touch_missing_key() {
            let mut map = abc();
            assert_eq!(map.get_touch(&"z", Touch::AsNew), None);
            assert!(!map.touch(&"z", Touch::AsOld));
            assert!(map.touch(&"b", Touch::AsOld));
            assert_eq!(keys_of(&map), vec!["b", "a", "c"]);
        }

        #[test]
        fn single_entry_touch() {
            let mut map = OrderedMap::new();
            map.set(1, 1, Touch::None);
            map.get_touch(&1, Touch::AsOld);
            map.get_touch(&1, Touch::AsNew);
            assert_eq!(keys_of(&map), vec![1]);
            map.debug_validate_invariants();
        }
    }

    // ==============================================
    // Removal
    // ==============================================

    mod removal {
        use super::*;

        #[test]
        fn delete_head_middle_tail() {
            let mut map = abc();
            map.set("d", 4, Touch::None);
            assert!(map.delete(&"b"));
            assert_eq!(keys_of(&map), vec!["a", "c", "d"]);
            assert!(map.delete(&"a"));
            assert_eq!(map.front(), Some((&"c", &3)));
            assert!(map.delete(&"d"));
            assert_eq!(map.back(), Some((&"c", &3)));
            assert!(!map.delete(&"d"));
            map.debug_validate_invariants();
        }

        #[test]
        fn remove_returns_value() {
            let mut map = abc();
            assert_eq!(map.remove(&"b"), Some(2));
            assert_eq!(map.remove(&"b"), None);
            assert_eq!(map.remove_entry(&"c"), Some(("c", 3)));
            assert_eq!(map.len(), 1);
        }

        #[test]
        fn shift_dequeues_in_order() {
            let mut map = abc();
            assert_eq!(map.shift().unwrap(), Some(("a", 1)));
            assert_eq!(map.shift().unwrap(), Some(("b", 2)));
            assert_eq!(map.shift().unwrap(), Some(("c", 3)));
            assert_eq!(map.shift().unwrap(), None);
            assert!(map.is_empty());
            map.debug_validate_invariants();
        }

        #[test]
        fn pop_back_takes_newest() {
            let mut map = abc();
            assert_eq!(map.pop_back(), Some(("c", 3)));
            assert_eq!(keys_of(&map), vec!["a", "b"]);
        }

        #[test]
        fn clear_then_reuse() {
            let mut map = abc();
            map.clear();
            assert!(map.is_empty());
            assert_eq!(map.get(&"a"), None);
            map.set("x", 9, Touch::None);
            assert_eq!(keys_of(&map), vec!["x"]);
            map.debug_validate_invariants();
        }
    }

    // ==============================================
    // Trimming
    // ==============================================

    mod trimming {
        use super::*;

        fn numbered(n: u32) -> OrderedMap<u32, u32> {
            (0..n).map(|i| (i, i)).collect()
        }

        #[test]
        fn trim_old_drops_head_entries() {
            let mut map = numbered(5);
            assert_eq!(map.trim_old(2), 3);
            assert_eq!(keys_of(&map), vec![3, 4]);
            assert!(!map.contains(&0));
            map.debug_validate_invariants();
        }

        #[test]
        fn trim_new_drops_tail_entries() {
            let mut map = numbered(5);
            assert_eq!(map.trim_new(2), 3);
            assert_eq!(keys_of(&map), vec![0, 1]);
            assert!(!map.contains(&4));
            map.debug_validate_invariants();
        }

        #[test]
        fn trim_to_larger_size_is_noop() {
            let mut map = numbered(3);
            let generation = map.generation();
            assert_eq!(map.trim_old(3), 0);
            assert_eq!(map.trim_new(10), 0);
            assert_eq!(map.len(), 3);
            assert_eq!(map.generation(), generation);
        }

        #[test]
        fn trim_to_zero_clears() {
            let mut map = numbered(4);
            assert_eq!(map.trim_old(0), 4);
            assert!(map.is_empty());
            let mut map = numbered(4);
            assert_eq!(map.trim_new(0), 4);
            assert!(map.is_empty());
            map.debug_validate_invariants();
        }
    }

    // ==============================================
    // Generation & Cursor
    // ==============================================

    mod generation {
        use super::*;

        #[test]
        fn structural_changes_bump_generation() {
            let mut map = OrderedMap::new();
            let g0 = map.generation();
            map.set(1, 1, Touch::None);
            let g1 = map.generation();
            assert!(g1 > g0);
            map.set(2, 2, Touch::None);
            map.get_touch(&1, Touch::AsNew);
            let g2 = map.generation();
            assert!(g2 > g1);
            map.delete(&2);
            assert!(map.generation() > g2);
        }

        #[test]
        fn value_overwrite_keeps_generation() {
            let mut map = abc();
            let generation = map.generation();
            map.set("b", 99, Touch::None);
            *map.get_mut(&"c").unwrap() = 7;
            map.for_each_mut(|_, v| *v += 1);
            assert_eq!(map.generation(), generation);
        }

        #[test]
        fn cursor_walks_head_to_tail() {
            let map = abc();
            let mut cursor = map.cursor();
            let mut seen = Vec::new();
            while let Some((k, v)) = cursor.next(&map).unwrap() {
                seen.push((*k, *v));
            }
            assert_eq!(seen, vec![("a", 1), ("b", 2), ("c", 3)]);
            assert_eq!(cursor.next(&map).unwrap(), None);
        }

        #[test]
        fn cursor_detects_insert() {
            let mut map = abc();
            let mut cursor = map.cursor();
            cursor.next(&map).unwrap();
            map.set("d", 4, Touch::None);
            assert!(!cursor.is_valid(&map));
            let err = cursor.next(&map).unwrap_err();
            assert!(matches!(err, MapError::IterationInvalidated { .. }));
            // Stays invalid.
            assert!(cursor.next(&map).is_err());
        }

        #[test]
        fn cursor_detects_relocation_and_removal() {
            let mut map = abc();
            let mut cursor = map.cursor();
            map.get_touch(&"a", Touch::AsNew);
            assert!(cursor.next(&map).is_err());

            let mut cursor = map.cursor();
            map.delete(&"b");
            assert!(cursor.next(&map).is_err());
        }

        #[test]
        fn cursor_survives_value_overwrite() {
            let mut map = abc();
            let mut cursor = map.cursor();
            assert_eq!(cursor.next(&map).unwrap(), Some((&"a", &1)));
            map.set("b", 20, Touch::None);
            assert_eq!(cursor.next(&map).unwrap(), Some((&"b", &20)));
        }

        #[test]
        fn cursor_on_empty_map() {
            let map: OrderedMap<u8, u8> = OrderedMap::new();
            let mut cursor = map.cursor();
            assert_eq!(cursor.next(&map).unwrap(), None);
        }
    }

    // ==============================================
    // Traversal & Snapshots
    // ==============================================

    mod traversal {
        use super::*;

        #[test]
        fn for_each_visits_in_order() {
            let map = abc();
            let mut out = String::new();
            map.for_each(|k, v| out.push_str(&format!("{k}{v}")));
            assert_eq!(out, "a1b2c3");
        }

        #[test]
        fn iter_rev_and_len() {
            let map = abc();
            assert_eq!(map.iter().len(), 3);
            assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), vec!["c", "b", "a"]);
            assert_eq!((&map).into_iter().count(), 3);
        }

        #[test]
        fn entries_round_trip() {
            let mut map = abc();
            map.get_touch(&"a", Touch::AsNew);
            let entries = map.to_entries();
            assert_eq!(entries, vec![("b", 2), ("c", 3), ("a", 1)]);

            map.clear();
            map.load_entries(entries.clone());
            assert_eq!(map.to_entries(), entries);
            for (k, v) in &entries {
                assert_eq!(map.get(k), Some(v));
            }
        }

        #[test]
        fn load_entries_moves_existing_keys_to_tail() {
            let mut map = abc();
            map.load_entries(vec![("a", 10)]);
            assert_eq!(keys_of(&map), vec!["b", "c", "a"]);
            assert_eq!(map.get(&"a"), Some(&10));
        }

        #[test]
        fn debug_formats_as_map() {
            let map = abc();
            assert_eq!(format!("{map:?}"), r#"{"a": 1, "b": 2, "c": 3}"#);
        }

        #[test]
        fn slots_are_recycled() {
            let mut map = OrderedMap::with_capacity(4);
            for round in 0..10u32 {
                for i in 0..4u32 {
                    map.set(round * 4 + i, i, Touch::None);
                }
                map.trim_old(0);
            }
            map.shrink_to_fit();
            assert!(map.is_empty());
            map.debug_validate_invariants();
        }
    }

    #[cfg(feature = "serde")]
    mod serde_support {
        use super::*;

        #[test]
        fn json_round_trip_preserves_order() {
            let mut map = abc();
            map.get_touch(&"a", Touch::AsNew);
            let json = serde_json::to_string(&map).unwrap();
            assert_eq!(json, r#"[["b",2],["c",3],["a",1]]"#);

            let back: OrderedMap<String, i32> = serde_json::from_str(&json).unwrap();
            assert_eq!(
                back.keys().cloned().collect::<Vec<_>>(),
                vec!["b".to_string(), "c".to_string(), "a".to_string()]
            );
        }
    }
}
