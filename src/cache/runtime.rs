//! Runtime tier: bounded, demand-filled, LRU-evicted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::entry::CachedZip;
use crate::cache::lru::ZipLru;
use crate::district::ZipEntry;
use crate::zip::ZipCode;

/// The second cache tier. Every cold lookup lands here, so over time it
/// holds whatever the current traffic actually asks for, bounded by
/// capacity with least-recently-used eviction.
pub struct RuntimeCache {
    inner: Mutex<ZipLru>,
    evictions: AtomicU64,
}

impl RuntimeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ZipLru::new(capacity.max(1))),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a ZIP, promoting it to most recently used on hit.
    pub fn get(&self, zip: &ZipCode) -> Option<Arc<ZipEntry>> {
        self.inner.lock().get(zip).map(|cached| cached.entry.clone())
    }

    /// Cache a resolved entry, evicting the least recently used ZIP if the
    /// tier is full.
    pub fn insert(&self, zip: ZipCode, entry: Arc<ZipEntry>) {
        let evicted = self.inner.lock().insert(CachedZip::new(zip, entry));
        if let Some(victim) = evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            trace!(zip = %victim.zip, "evicted from runtime cache");
        }
    }

    /// Membership check without recency promotion.
    pub fn contains(&self, zip: &ZipCode) -> bool {
        self.inner.lock().contains(zip)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Total evictions since construction.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::district::{DistrictNumber, DistrictRef, StateCode};
    use std::thread;

    fn zip(s: &str) -> ZipCode {
        s.parse().unwrap()
    }

    fn entry(state: &str, district: &str) -> Arc<ZipEntry> {
        Arc::new(ZipEntry::new(vec![DistrictRef::primary(
            StateCode::parse(state).unwrap(),
            DistrictNumber::parse(district).unwrap(),
        )]))
    }

    #[test]
    fn test_insert_get() {
        let cache = RuntimeCache::new(8);
        cache.insert(zip("48201"), entry("MI", "12"));

        let got = cache.get(&zip("48201")).unwrap();
        assert_eq!(got.primary().to_string(), "MI-12");
        assert!(cache.get(&zip("90210")).is_none());
    }

    #[test]
    fn test_eviction_counter() {
        let cache = RuntimeCache::new(2);
        cache.insert(zip("10001"), entry("NY", "12"));
        cache.insert(zip("10002"), entry("NY", "10"));
        assert_eq!(cache.evictions(), 0);

        cache.insert(zip("10003"), entry("NY", "07"));
        assert_eq!(cache.evictions(), 1);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&zip("10001")));
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let cache = RuntimeCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(zip("48201"), entry("MI", "12"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_inserts_stay_bounded() {
        let cache = Arc::new(RuntimeCache::new(64));
        let mut handles = Vec::new();

        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let code = format!("{:05}", 10000 + t * 1000 + i);
                    cache.insert(code.parse().unwrap(), entry("NY", "12"));
                    cache.get(&code.parse().unwrap());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 64);
        assert!(cache.evictions() > 0);
    }
}
