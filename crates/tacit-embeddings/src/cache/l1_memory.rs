//! moka cache keyed by content hash.

use std::time::Duration;

use moka::sync::Cache;

/// Embedding vectors keyed by blake3 content hash. A unit's hash changes with
/// its content, so stale entries are never returned for edited units.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100);
        cache.insert("abc".to_string(), vec![1.0, 2.0]);
        assert_eq!(cache.get("abc"), Some(vec![1.0, 2.0]));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn clear_invalidates() {
        let cache = EmbeddingCache::new(100);
        cache.insert("a".to_string(), vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }
}
