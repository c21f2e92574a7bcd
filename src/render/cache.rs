use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Which conversion produced a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    Html,
    PlainText,
}

type CacheKey = (RenderFormat, Arc<str>);

/// Bounded least-recently-used map from markdown input to converted output.
#[derive(Debug)]
pub struct RenderCache {
    capacity: usize,
    entries: HashMap<CacheKey, Arc<str>>,
    /// Most recently used at the back.
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Return the cached output for `input`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, format: RenderFormat, input: &str, render: F) -> Arc<str>
    where
        F: FnOnce(&str) -> String,
    {
        let key: CacheKey = (format, Arc::from(input));
        if let Some(output) = self.entries.get(&key).cloned() {
            self.hits += 1;
            self.promote(&key);
            return output;
        }

        self.misses += 1;
        let output: Arc<str> = Arc::from(render(input));
        if self.capacity == 0 {
            return output;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, Arc::clone(&output));
        output
    }

    fn promote(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(input: &str) -> String {
        input.to_uppercase()
    }

    #[test]
    fn repeated_input_is_served_from_cache() {
        let mut cache = RenderCache::new(4);
        let mut calls = 0;
        for _ in 0..3 {
            let out = cache.get_or_insert_with(RenderFormat::Html, "abc", |s| {
                calls += 1;
                upper(s)
            });
            assert_eq!(&*out, "ABC");
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn formats_are_cached_separately() {
        let mut cache = RenderCache::new(4);
        cache.get_or_insert_with(RenderFormat::Html, "x", |_| "<p>x</p>".into());
        let plain = cache.get_or_insert_with(RenderFormat::PlainText, "x", |_| "x".into());
        assert_eq!(&*plain, "x");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = RenderCache::new(2);
        cache.get_or_insert_with(RenderFormat::Html, "a", upper);
        cache.get_or_insert_with(RenderFormat::Html, "b", upper);
        // Touch "a" so "b" becomes the eviction candidate.
        cache.get_or_insert_with(RenderFormat::Html, "a", upper);
        cache.get_or_insert_with(RenderFormat::Html, "c", upper);

        assert_eq!(cache.len(), 2);
        let misses = cache.misses();
        cache.get_or_insert_with(RenderFormat::Html, "a", upper);
        assert_eq!(cache.misses(), misses);
        cache.get_or_insert_with(RenderFormat::Html, "b", upper);
        assert_eq!(cache.misses(), misses + 1);
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = RenderCache::new(0);
        cache.get_or_insert_with(RenderFormat::Html, "a", upper);
        cache.get_or_insert_with(RenderFormat::Html, "a", upper);
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 2);
    }
}
