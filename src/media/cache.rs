use std::num::NonZeroUsize;

use lru::LruCache;

use super::frame::RgbaFrame;

const DEFAULT_MEMORY_BUDGET_BYTES: usize = 64 * 1024 * 1024;
const DEFAULT_MAX_ENTRIES: usize = 24;

/// A photo decoded for one leaf at one pixel bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoKey {
    pub leaf: usize,
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
pub struct PhotoCache {
    max_entries: usize,
    memory_budget_bytes: usize,
    memory_bytes: usize,
    entries: LruCache<PhotoKey, RgbaFrame>,
    counters: CacheCounters,
}

impl Default for PhotoCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MEMORY_BUDGET_BYTES)
    }
}

impl PhotoCache {
    pub fn new(max_entries: usize, memory_budget_bytes: usize) -> Self {
        let max_entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_entries: max_entries.get(),
            memory_budget_bytes: memory_budget_bytes.max(1),
            memory_bytes: 0,
            entries: LruCache::new(max_entries),
            counters: CacheCounters::default(),
        }
    }

    pub fn get(&mut self, key: &PhotoKey) -> Option<&RgbaFrame> {
        if self.entries.peek(key).is_some() {
            self.counters.hits += 1;
            return self.entries.get(key);
        }

        self.counters.misses += 1;
        None
    }

    /// Rejects photos larger than the whole budget.
    pub fn insert(&mut self, key: PhotoKey, frame: RgbaFrame) -> bool {
        let frame_bytes = frame.byte_len();
        if frame_bytes > self.memory_budget_bytes {
            return false;
        }

        if let Some(prev) = self.entries.pop(&key) {
            self.memory_bytes = self.memory_bytes.saturating_sub(prev.byte_len());
        }
        if self.entries.len() >= self.max_entries
            && let Some((_key, evicted)) = self.entries.pop_lru()
        {
            self.memory_bytes = self.memory_bytes.saturating_sub(evicted.byte_len());
            self.counters.evictions += 1;
        }

        self.memory_bytes += frame_bytes;
        self.entries.put(key, frame);
        self.evict_while_over_budget();
        true
    }

    pub fn contains(&self, key: &PhotoKey) -> bool {
        self.entries.peek(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn memory_budget_bytes(&self) -> usize {
        self.memory_budget_bytes
    }

    pub fn memory_bytes(&self) -> usize {
        self.memory_bytes
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.counters.hits + self.counters.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.counters.hits as f64 / lookups as f64
    }

    fn evict_while_over_budget(&mut self) {
        while self.memory_bytes > self.memory_budget_bytes && self.entries.len() > 1 {
            let Some((_key, frame)) = self.entries.pop_lru() else {
                break;
            };
            self.memory_bytes = self.memory_bytes.saturating_sub(frame.byte_len());
            self.counters.evictions += 1;
        }
    }
}
