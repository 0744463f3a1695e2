//! Unified tiered lookup.
//!
//! # Architecture
//!
//! ```text
//!     lookup(zip)
//!        |
//!        v
//!   +-----------+     pinned membership, filled by warm-up only
//!   | hot tier  |---- hit: return
//!   +-----------+
//!        | miss
//!        v
//!   +-----------+     bounded LRU over live traffic
//!   | runtime   |---- hit: return, entry promoted to most recent
//!   +-----------+
//!        | miss
//!        v
//!   +-----------+     frozen full table
//!   | store     |---- hit: back-fill runtime tier, return
//!   +-----------+
//!        | miss
//!        v
//!      (none)
//! ```
//!
//! The walk stops at the first hit. A store hit back-fills the runtime
//! tier so repeat traffic stays off the cold path; nothing on this path
//! ever writes the hot tier, which keeps its contents predictable.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::hot::{default_hot_zips, FillOutcome, HotCache};
use crate::cache::runtime::RuntimeCache;
use crate::cache::DEFAULT_RUNTIME_CAPACITY;
use crate::district::{StateCode, ZipEntry};
use crate::store::{MappingStore, StateRanges};
use crate::zip::ZipCode;

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// Pinned hot tier
    Hot,
    /// Bounded runtime LRU
    Runtime,
    /// Mapping store fallthrough
    Cold,
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTier::Hot => write!(f, "hot"),
            CacheTier::Runtime => write!(f, "runtime"),
            CacheTier::Cold => write!(f, "cold"),
        }
    }
}

/// Cache construction parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Fixed hot tier membership
    pub hot_zips: Vec<ZipCode>,
    /// Runtime tier capacity in entries
    pub runtime_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            hot_zips: default_hot_zips().to_vec(),
            runtime_capacity: DEFAULT_RUNTIME_CAPACITY,
        }
    }
}

/// A successful lookup and the tier that served it.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub entry: Arc<ZipEntry>,
    pub tier: CacheTier,
}

/// Tier sizes and hit rate, shaped for the diagnostics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDiagnostics {
    /// Warmed hot tier slots
    pub hot_cache_size: usize,
    /// Resident runtime tier entries
    pub runtime_cache_size: usize,
    /// State prefix ranges in the derived table
    pub state_cache_size: usize,
    /// Fraction of lookups served by the hot and runtime tiers
    pub cache_hit_rate: f64,
}

/// The three cache tiers and the store behind them, walked as one unit.
pub struct TieredCache {
    store: Arc<MappingStore>,
    hot: HotCache,
    runtime: RuntimeCache,
    states: StateRanges,
}

impl TieredCache {
    pub fn new(store: Arc<MappingStore>, config: &CacheConfig) -> Self {
        let states = StateRanges::build(&store);
        Self {
            hot: HotCache::new(config.hot_zips.iter().copied()),
            runtime: RuntimeCache::new(config.runtime_capacity),
            states,
            store,
        }
    }

    /// Walk hot, runtime, store; first hit wins. A store hit back-fills
    /// the runtime tier. Returns `None` for unmapped ZIPs.
    pub fn lookup(&self, zip: &ZipCode) -> Option<CacheHit> {
        if let Some(entry) = self.hot.get(zip) {
            return Some(CacheHit {
                entry,
                tier: CacheTier::Hot,
            });
        }

        if let Some(entry) = self.runtime.get(zip) {
            return Some(CacheHit {
                entry,
                tier: CacheTier::Runtime,
            });
        }

        let entry = self.store.get(zip)?;
        self.runtime.insert(*zip, entry.clone());
        Some(CacheHit {
            entry,
            tier: CacheTier::Cold,
        })
    }

    /// State-only lookup against the derived prefix ranges. Never touches
    /// the district tiers.
    pub fn state_for(&self, zip: &ZipCode) -> Option<StateCode> {
        self.states.state_for(zip)
    }

    /// Warm-up write path into the hot tier.
    pub(crate) fn fill_hot(&self, zip: ZipCode, entry: Arc<ZipEntry>) -> FillOutcome {
        self.hot.fill(zip, entry)
    }

    pub fn hot(&self) -> &HotCache {
        &self.hot
    }

    pub fn runtime(&self) -> &RuntimeCache {
        &self.runtime
    }

    pub fn state_ranges(&self) -> &StateRanges {
        &self.states
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Snapshot tier sizes. The hit rate comes from the metrics collector,
    /// which owns lookup counting.
    pub fn diagnostics(&self, cache_hit_rate: f64) -> CacheDiagnostics {
        CacheDiagnostics {
            hot_cache_size: self.hot.len(),
            runtime_cache_size: self.runtime.len(),
            state_cache_size: self.states.len(),
            cache_hit_rate,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zip(s: &str) -> ZipCode {
        s.parse().unwrap()
    }

    fn cache_with(hot_zips: &[&str], capacity: usize) -> TieredCache {
        let store = Arc::new(
            MappingStore::load_from_str(
                r#"{
                    "congress": 118,
                    "zips": {
                        "48201": { "state": "MI", "district": "12" },
                        "48226": { "state": "MI", "district": "13" },
                        "90210": { "state": "CA", "district": "36" },
                        "01007": { "state": "MA", "districts": ["01", "02"] }
                    }
                }"#,
            )
            .unwrap(),
        );
        let config = CacheConfig {
            hot_zips: hot_zips.iter().map(|s| s.parse().unwrap()).collect(),
            runtime_capacity: capacity,
        };
        TieredCache::new(store, &config)
    }

    #[test]
    fn test_cold_then_runtime() {
        let cache = cache_with(&[], 8);

        let first = cache.lookup(&zip("48201")).unwrap();
        assert_eq!(first.tier, CacheTier::Cold);

        let second = cache.lookup(&zip("48201")).unwrap();
        assert_eq!(second.tier, CacheTier::Runtime);
        assert!(Arc::ptr_eq(&first.entry, &second.entry));
    }

    #[test]
    fn test_unmapped_zip_misses_all_tiers() {
        let cache = cache_with(&[], 8);
        assert!(cache.lookup(&zip("99999")).is_none());
        // a miss caches nothing
        assert_eq!(cache.runtime().len(), 0);
    }

    #[test]
    fn test_hot_hit_after_warm_fill() {
        let cache = cache_with(&["48201"], 8);
        let entry = cache.store().get(&zip("48201")).unwrap();
        cache.fill_hot(zip("48201"), entry);

        let hit = cache.lookup(&zip("48201")).unwrap();
        assert_eq!(hit.tier, CacheTier::Hot);
        // hot hits do not populate the runtime tier
        assert_eq!(cache.runtime().len(), 0);
    }

    #[test]
    fn test_lookup_never_writes_hot_tier() {
        let cache = cache_with(&["48201"], 8);

        // member ZIP, but unwarmed: served cold, hot stays empty
        let hit = cache.lookup(&zip("48201")).unwrap();
        assert_eq!(hit.tier, CacheTier::Cold);
        assert_eq!(cache.hot().len(), 0);

        // and the repeat comes from runtime, not hot
        let hit = cache.lookup(&zip("48201")).unwrap();
        assert_eq!(hit.tier, CacheTier::Runtime);
        assert_eq!(cache.hot().len(), 0);
    }

    #[test]
    fn test_state_lookup_does_not_populate_caches() {
        let cache = cache_with(&[], 8);
        let state = cache.state_for(&zip("48215")).unwrap();
        assert_eq!(state.as_str(), "MI");
        assert_eq!(cache.runtime().len(), 0);
    }

    #[test]
    fn test_diagnostics_sizes() {
        let cache = cache_with(&["48201"], 8);
        cache.lookup(&zip("90210"));
        let entry = cache.store().get(&zip("48201")).unwrap();
        cache.fill_hot(zip("48201"), entry);

        let diag = cache.diagnostics(0.5);
        assert_eq!(diag.hot_cache_size, 1);
        assert_eq!(diag.runtime_cache_size, 1);
        // one range per distinct prefix here: 010, 482, 902
        assert_eq!(cache.state_ranges().len(), 3);
        assert_eq!(diag.state_cache_size, cache.state_ranges().len());
        assert!((diag.cache_hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(CacheTier::Hot.to_string(), "hot");
        assert_eq!(CacheTier::Runtime.to_string(), "runtime");
        assert_eq!(CacheTier::Cold.to_string(), "cold");
    }
}
