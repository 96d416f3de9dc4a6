//! Bounded LRU cache of decoded byte blocks.
//!
//! Entries live in a fixed arena of slots linked into a recency list (most
//! recently used at the head). A `HashMap` maps block keys to slots. When the
//! arena is full the tail slot is reused in place for the incoming block.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

/// Default number of cached blocks
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// Decoded bytes per cache block
pub const CACHE_BLOCK_SIZE: u64 = 64 * 1024;

/// Identifies a block of decoded bytes within a contig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockKey {
    pub contig_id: usize,
    pub block_id: u64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Slot {
    key: BlockKey,
    block: Arc<[u8]>,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct BlockCache {
    capacity: usize,
    slots: Vec<Slot>,
    lookup: HashMap<BlockKey, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    stats: CacheStats,
}

impl BlockCache {
    /// Create a cache holding at most `capacity` blocks; 0 disables caching
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity.min(1024)),
            lookup: HashMap::with_capacity(capacity.min(1024)),
            head: None,
            tail: None,
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &BlockKey) -> bool {
        self.lookup.contains_key(key)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every cached block; statistics are kept
    pub fn clear(&mut self) {
        self.slots.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    /// Return the block for `key`, decoding and caching it on a miss.
    ///
    /// A failed decode leaves the cache untouched.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `decode`.
    pub fn get_or_decode<E, F>(&mut self, key: BlockKey, decode: F) -> Result<Arc<[u8]>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        if let Some(&slot) = self.lookup.get(&key) {
            self.stats.hits += 1;
            self.touch(slot);
            trace!("Cache hit for {:?}", key);
            return Ok(Arc::clone(&self.slots[slot].block));
        }

        self.stats.misses += 1;
        trace!("Cache miss for {:?}", key);
        let block: Arc<[u8]> = decode()?.into();

        if self.capacity > 0 {
            self.insert(key, Arc::clone(&block));
        }
        Ok(block)
    }

    fn insert(&mut self, key: BlockKey, block: Arc<[u8]>) {
        let slot = if self.slots.len() < self.capacity {
            self.slots.push(Slot {
                key,
                block,
                prev: None,
                next: None,
            });
            self.slots.len() - 1
        } else {
            // Full: recycle the least recently used slot
            let Some(slot) = self.tail else { return };
            self.unlink(slot);
            let evicted = std::mem::replace(&mut self.slots[slot].key, key);
            self.slots[slot].block = block;
            self.lookup.remove(&evicted);
            self.stats.evictions += 1;
            trace!("Evicted {:?}", evicted);
            slot
        };

        self.lookup.insert(key, slot);
        self.push_front(slot);
    }

    fn touch(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[slot].prev = None;
        self.slots[slot].next = None;
    }

    fn push_front(&mut self, slot: usize) {
        self.slots[slot].prev = None;
        self.slots[slot].next = self.head;
        if let Some(h) = self.head {
            self.slots[h].prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }
}

impl std::fmt::Debug for BlockCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn key(block_id: u64) -> BlockKey {
        BlockKey {
            contig_id: 0,
            block_id,
        }
    }

    fn decode(block_id: u64) -> impl FnOnce() -> Result<Vec<u8>, Infallible> {
        move || Ok(vec![block_id as u8; 4])
    }

    #[test]
    fn test_hit_after_miss() {
        let mut cache = BlockCache::new(2);
        let first = cache.get_or_decode(key(1), decode(1)).unwrap();
        let second = cache
            .get_or_decode(key(1), || -> Result<Vec<u8>, Infallible> {
                panic!("should not decode a cached block")
            })
            .unwrap();

        assert_eq!(&*first, &[1, 1, 1, 1]);
        assert_eq!(first, second);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = BlockCache::new(2);
        cache.get_or_decode(key(1), decode(1)).unwrap();
        cache.get_or_decode(key(2), decode(2)).unwrap();
        // Touch 1 so that 2 becomes the eviction candidate
        cache.get_or_decode(key(1), decode(1)).unwrap();
        cache.get_or_decode(key(3), decode(3)).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_keys_distinguish_contigs() {
        let mut cache = BlockCache::new(4);
        let a = BlockKey {
            contig_id: 0,
            block_id: 0,
        };
        let b = BlockKey {
            contig_id: 1,
            block_id: 0,
        };
        cache.get_or_decode(a, decode(7)).unwrap();
        cache.get_or_decode(b, decode(9)).unwrap();
        assert_eq!(&*cache.get_or_decode(a, decode(0)).unwrap(), &[7, 7, 7, 7]);
        assert_eq!(&*cache.get_or_decode(b, decode(0)).unwrap(), &[9, 9, 9, 9]);
    }

    #[test]
    fn test_zero_capacity_always_decodes() {
        let mut cache = BlockCache::new(0);
        for _ in 0..3 {
            assert_eq!(&*cache.get_or_decode(key(5), decode(5)).unwrap(), &[5, 5, 5, 5]);
        }
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 3);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_failed_decode_is_not_cached() {
        let mut cache = BlockCache::new(2);
        let result = cache.get_or_decode(key(1), || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert!(cache.is_empty());

        let block = cache
            .get_or_decode(key(1), || -> Result<Vec<u8>, &str> { Ok(vec![1]) })
            .unwrap();
        assert_eq!(&*block, &[1]);
    }

    #[test]
    fn test_single_slot_churn() {
        let mut cache = BlockCache::new(1);
        for id in 0..10 {
            cache.get_or_decode(key(id), decode(id)).unwrap();
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&key(id)));
        }
        assert_eq!(cache.stats().evictions, 9);
    }

    #[test]
    fn test_recency_order_over_many_inserts() {
        let mut cache = BlockCache::new(3);
        for id in [1, 2, 3, 1, 4, 2, 5] {
            cache.get_or_decode(key(id), decode(id)).unwrap();
        }
        // 1,2,3 -> touch 1 -> 4 evicts 2 -> 2 evicts 3 -> 5 evicts 1
        assert!(cache.contains(&key(4)));
        assert!(cache.contains(&key(2)));
        assert!(cache.contains(&key(5)));
        assert!(!cache.contains(&key(1)));
        assert!(!cache.contains(&key(3)));
    }

    #[test]
    fn test_clear() {
        let mut cache = BlockCache::new(2);
        cache.get_or_decode(key(1), decode(1)).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_decode(key(1), decode(1)).unwrap();
        assert_eq!(cache.stats().misses, 2);
    }
}
