use dashmap::DashMap;

/// Last observed store revision per key.
///
/// Shared between watch loops and plain lookups; every access goes through
/// the concurrent map, so a watcher task and a caller can touch the same
/// key without further locking.
#[derive(Debug, Default)]
pub struct IndexTracker {
    indexes: DashMap<String, u64>,
}

impl IndexTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<u64> {
        self.indexes.get(key).map(|index| *index)
    }

    /// Records `index` as the latest observation for `key`
    pub fn set(
        &self,
        key: &str,
        index: u64,
    ) {
        self.indexes.insert(key.to_string(), index);
    }

    pub fn remove(
        &self,
        key: &str,
    ) -> Option<u64> {
        self.indexes.remove(key).map(|(_, index)| index)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
