pub mod intrusive_list;
pub mod ordered_map;
pub mod skip_list;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use ordered_map::{Cursor, OrderedMap, Touch};
pub use skip_list::{CoinFlip, LevelGenerator, SkipList};
pub use slot_arena::{SlotArena, SlotId};
