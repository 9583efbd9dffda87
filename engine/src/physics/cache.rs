//! Versioned value cache
//!
//! Remembers one derived value together with the key it was computed for.
//! Readers pass the current key; when it differs from the stored one the
//! value is recomputed, so stale results are never returned.
//!
//! Used by the character controller to keep the floor height under the
//! character until it moves or the level changes.
//!
//! # Example
//!
//! ```ignore
//! use stygian_engine::physics::cache::VersionedCache;
//!
//! let mut cache = VersionedCache::new();
//! let floor = cache.get_or_update((index.id(), version), || index.highest_plane(pos, r));
//! ```

/// A single cached value keyed by a version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionedCache<K, T> {
    entry: Option<(K, T)>,
}

impl<K, T> Default for VersionedCache<K, T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K: PartialEq + Copy, T: Copy> VersionedCache<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value if it was computed for `key`.
    pub fn get(&self, key: K) -> Option<T> {
        match self.entry {
            Some((stored, value)) if stored == key => Some(value),
            _ => None,
        }
    }

    /// Returns the value for `key`, recomputing it with `compute` when the
    /// stored one belongs to a different key.
    pub fn get_or_update(&mut self, key: K, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = compute();
        self.entry = Some((key, value));
        value
    }

    /// Drops the stored value.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_valid_for(&self, key: K) -> bool {
        self.get(key).is_some()
    }
}
