//! Capacity-limited cache with first-in first-out eviction.

use std::collections::{HashMap, VecDeque};

/// A map from command text to a remembered value, holding at most
/// `capacity` entries. Inserting into a full cache evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedCache<V> {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, V>,
}

impl<V> BoundedCache<V> {
    /// Create an empty cache. A capacity of zero caches nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite a key. Overwriting keeps the key's original age.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn overwrite_keeps_age() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        cache.insert("c", 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn remove_frees_a_slot() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.remove("a"), Some(1));
        cache.insert("c", 3);
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.remove("zzz"), None);
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let mut cache = BoundedCache::new(0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }
}
