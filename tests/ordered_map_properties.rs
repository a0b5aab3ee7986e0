// ==============================================
// ORDERED MAP PROPERTY TESTS (integration)
// ==============================================
//
// Drives OrderedMap with random operation sequences and compares the result
// against a plain Vec model after every step.

use ordcache::ds::{OrderedMap, Touch};
use ordcache::error::MapError;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u32, Touch),
    Get(u8, Touch),
    Delete(u8),
    Shift,
    PopBack,
    TrimOld(usize),
    TrimNew(usize),
}

fn touch_strategy() -> impl Strategy<Value = Touch> {
    prop_oneof![Just(Touch::None), Just(Touch::AsOld), Just(Touch::AsNew)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..16, any::<u32>(), touch_strategy()).prop_map(|(k, v, t)| Op::Insert(k, v, t)),
        3 => (0u8..16, touch_strategy()).prop_map(|(k, t)| Op::Get(k, t)),
        2 => (0u8..16).prop_map(Op::Delete),
        1 => Just(Op::Shift),
        1 => Just(Op::PopBack),
        1 => (0usize..12).prop_map(Op::TrimOld),
        1 => (0usize..12).prop_map(Op::TrimNew),
    ]
}

/// Reference model: entries in list order.
#[derive(Default)]
struct Model(Vec<(u8, u32)>);

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.0.iter().position(|(k, _)| *k == key)
    }

    fn relocate(&mut self, idx: usize, touch: Touch) {
        match touch {
            Touch::None => {},
            Touch::AsOld => {
                let entry = self.0.remove(idx);
                self.0.insert(0, entry);
            },
            Touch::AsNew => {
                let entry = self.0.remove(idx);
                self.0.push(entry);
            },
        }
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Insert(k, v, touch) => match self.position(k) {
                Some(idx) => {
                    self.0[idx].1 = v;
                    self.relocate(idx, touch);
                },
                None if touch == Touch::AsOld => self.0.insert(0, (k, v)),
                None => self.0.push((k, v)),
            },
            Op::Get(k, touch) => {
                if let Some(idx) = self.position(k) {
                    self.relocate(idx, touch);
                }
            },
            Op::Delete(k) => {
                if let Some(idx) = self.position(k) {
                    self.0.remove(idx);
                }
            },
            Op::Shift => {
                if !self.0.is_empty() {
                    self.0.remove(0);
                }
            },
            Op::PopBack => {
                self.0.pop();
            },
            Op::TrimOld(n) => {
                if n < self.0.len() {
                    let cut = self.0.len() - n;
                    self.0.drain(..cut);
                }
            },
            Op::TrimNew(n) => self.0.truncate(n),
        }
    }
}

fn apply(map: &mut OrderedMap<u8, u32>, op: &Op) {
    match *op {
        Op::Insert(k, v, touch) => {
            map.insert(k, v, touch);
        },
        Op::Get(k, touch) => {
            map.get_touch(&k, touch);
        },
        Op::Delete(k) => {
            map.delete(&k);
        },
        Op::Shift => {
            map.shift().expect("shift on a consistent map");
        },
        Op::PopBack => {
            map.pop_back();
        },
        Op::TrimOld(n) => {
            map.trim_old(n);
        },
        Op::TrimNew(n) => {
            map.trim_new(n);
        },
    }
}

proptest! {
    /// Property: order and contents always match the model
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut map = OrderedMap::new();
        let mut model = Model::default();

        for op in &ops {
            apply(&mut map, op);
            model.apply(op);
            prop_assert_eq!(map.to_entries(), model.0.clone());
            prop_assert_eq!(map.len(), model.0.len());
        }
        #[cfg(debug_assertions)]
        map.debug_validate_invariants();
    }

    /// Property: any change in order or membership moves the generation
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_generation_tracks_structure(ops in prop::collection::vec(op_strategy(), 0..100)) {
        let mut map = OrderedMap::new();

        for op in &ops {
            let before_keys: Vec<u8> = map.keys().copied().collect();
            let before_gen = map.generation();
            apply(&mut map, op);
            let after_keys: Vec<u8> = map.keys().copied().collect();
            if before_keys != after_keys {
                prop_assert_ne!(map.generation(), before_gen);
            }
        }
    }

    /// Property: a cursor either sees the full list or reports invalidation
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_cursor_detects_structural_change(
        keys in prop::collection::vec(0u8..32, 1..20),
        op in op_strategy(),
        steps in 0usize..20,
    ) {
        let mut map = OrderedMap::new();
        for &k in &keys {
            map.insert(k, u32::from(k), Touch::None);
        }
        let mut cursor = map.cursor();
        for _ in 0..steps.min(map.len()) {
            prop_assert!(cursor.next(&map).is_ok());
        }

        let before = map.generation();
        apply(&mut map, &op);
        let result = cursor.next(&map);
        if map.generation() == before {
            prop_assert!(result.is_ok());
        } else {
            let invalidated = matches!(result, Err(MapError::IterationInvalidated { .. }));
            prop_assert!(invalidated);
        }
    }

    /// Property: to_entries then load_entries into an empty map reproduces it
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_entries_round_trip(ops in prop::collection::vec(op_strategy(), 0..100)) {
        let mut map = OrderedMap::new();
        for op in &ops {
            apply(&mut map, op);
        }

        let entries = map.to_entries();
        let mut restored = OrderedMap::new();
        restored.load_entries(entries.clone());
        prop_assert_eq!(restored.to_entries(), entries);
    }

    /// Property: trim_old(n) and trim_new(n) report exactly how many they evicted
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_trim_counts(len in 0usize..40, n in 0usize..50, old_end in any::<bool>()) {
        let mut map: OrderedMap<usize, ()> = (0..len).map(|k| (k, ())).collect();
        let evicted = if old_end { map.trim_old(n) } else { map.trim_new(n) };
        prop_assert_eq!(evicted, len.saturating_sub(n));
        prop_assert_eq!(map.len(), len.min(n));
    }
}
