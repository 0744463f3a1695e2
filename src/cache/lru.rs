//! LRU bookkeeping for the runtime tier.
//!
//! A doubly-linked recency list threaded through a slot vector, with a
//! hash index from ZIP to slot position. Lookup, insert, and evict are all
//! O(1). Freed slots recycle through a free list, so a cache at capacity
//! settles into a fixed allocation and stops touching the allocator.

use std::collections::HashMap;

use ahash::RandomState;

use crate::cache::entry::CachedZip;
use crate::zip::ZipCode;

struct Slot {
    value: CachedZip,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Single-threaded LRU core, wrapped in a mutex by the runtime tier.
pub(crate) struct ZipLru {
    index: HashMap<ZipCode, usize, RandomState>,
    slots: Vec<Option<Slot>>,
    /// Most recently used
    head: Option<usize>,
    /// Least recently used, the next eviction victim
    tail: Option<usize>,
    free: Vec<usize>,
    capacity: usize,
}

impl ZipLru {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LRU capacity must be positive");
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            capacity,
        }
    }

    /// Look up a ZIP and mark it most recently used.
    pub fn get(&mut self, zip: &ZipCode) -> Option<&CachedZip> {
        let idx = *self.index.get(zip)?;
        self.touch(idx);
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    pub fn contains(&self, zip: &ZipCode) -> bool {
        self.index.contains_key(zip)
    }

    /// Insert or refresh an entry. Returns the evicted victim when the
    /// insert pushed the cache past capacity.
    pub fn insert(&mut self, value: CachedZip) -> Option<CachedZip> {
        if let Some(&idx) = self.index.get(&value.zip) {
            if let Some(slot) = self.slots[idx].as_mut() {
                slot.value = value;
            }
            self.touch(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_tail()
        } else {
            None
        };

        let zip = value.zip;
        let idx = self.alloc(value);
        self.push_front(idx);
        self.index.insert(zip, idx);
        evicted
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Move a resident slot to the head of the recency list.
    fn touch(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Detach a slot from the recency list, repairing neighbors and ends.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.slots[idx] {
            Some(slot) => (slot.prev, slot.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(slot) = self.slots[p].as_mut() {
                    slot.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(slot) = self.slots[n].as_mut() {
                    slot.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = None;
        }
    }

    /// Link a detached slot in as the new head.
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(slot) = self.slots[h].as_mut() {
                slot.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Drop the least recently used entry. Unlinks before vacating the
    /// slot so list ends stay consistent across slot reuse.
    fn evict_tail(&mut self) -> Option<CachedZip> {
        let idx = self.tail?;
        self.unlink(idx);
        let slot = self.slots[idx].take()?;
        self.index.remove(&slot.value.zip);
        self.free.push(idx);
        Some(slot.value)
    }

    /// Place a value in a recycled or fresh slot, detached from the list.
    fn alloc(&mut self, value: CachedZip) -> usize {
        let slot = Slot {
            value,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
