//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;
