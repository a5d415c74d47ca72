#![forbid(unsafe_code)]

//! Identity-keyed measurement and position stores.
//!
//! Both stores are plain hash maps behind a narrow API. They are created
//! lazily, may be pre-seeded by the caller (e.g. server-rendered heights),
//! and are invalidated wholesale via [`MeasurementStore::reset`] /
//! [`PositionStore::reset`] when the container width changes.
//!
//! The stores are not synchronized; the engine's contract is single-threaded
//! (re-entrant-safe but not parallel-safe), so callers that share a store
//! across passes must serialize those passes themselves.

use std::collections::HashMap;
use std::hash::Hash;

use crate::geometry::Position;

/// Bound for item identities tracked by the stores.
///
/// Items are opaque to the engine; all it needs is a cloneable, hashable key
/// with a stable equality guarantee. Blanket-implemented for anything that
/// qualifies (integer handles, interned strings, ...).
pub trait ItemKey: Eq + Hash + Clone {}

impl<K: Eq + Hash + Clone> ItemKey for K {}

/// Item-keyed height cache.
///
/// Absence means "not measured yet", never an error.
#[derive(Debug, Clone)]
pub struct MeasurementStore<K: ItemKey> {
    entries: HashMap<K, f64>,
}

impl<K: ItemKey> MeasurementStore<K> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Measured height for an item, if known.
    pub fn get(&self, item: &K) -> Option<f64> {
        self.entries.get(item).copied()
    }

    /// Whether the item has been measured.
    pub fn contains(&self, item: &K) -> bool {
        self.entries.contains_key(item)
    }

    /// Record a measurement, replacing any previous one.
    pub fn set(&mut self, item: K, height: f64) {
        self.entries.insert(item, height);
    }

    /// Drop a single measurement.
    pub fn remove(&mut self, item: &K) -> Option<f64> {
        self.entries.remove(item)
    }

    /// Number of measured items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no items have been measured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, replacing the map wholesale.
    pub fn reset(&mut self) {
        self.entries = HashMap::new();
    }
}

impl<K: ItemKey> Default for MeasurementStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Item-keyed position cache.
///
/// Positions written during one layout pass are reused verbatim on the next,
/// which is what makes a warm relayout idempotent.
#[derive(Debug, Clone)]
pub struct PositionStore<K: ItemKey> {
    entries: HashMap<K, Position>,
}

impl<K: ItemKey> PositionStore<K> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Cached position for an item, if placed.
    pub fn get(&self, item: &K) -> Option<Position> {
        self.entries.get(item).copied()
    }

    /// Whether the item has a cached position.
    pub fn contains(&self, item: &K) -> bool {
        self.entries.contains_key(item)
    }

    /// Record a position, replacing any previous one.
    pub fn set(&mut self, item: K, position: Position) {
        self.entries.insert(item, position);
    }

    /// Drop a single position.
    pub fn remove(&mut self, item: &K) -> Option<Position> {
        self.entries.remove(item)
    }

    /// Number of placed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no items have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, replacing the map wholesale.
    pub fn reset(&mut self) {
        self.entries = HashMap::new();
    }
}

impl<K: ItemKey> Default for PositionStore<K> {
    fn default() -> Self {
        Self::new()
    }
}
