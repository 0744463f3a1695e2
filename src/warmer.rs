//! Cache warm-up.
//!
//! A warm-up pass primes caches before traffic arrives: hot tier members
//! get their pinned slot filled, everything else is pulled through the
//! normal cold path into the runtime tier. Warming never counts as lookup
//! traffic, so a freshly warmed resolver still reports a clean hit rate.

use serde::Serialize;
use tracing::{info, trace};

use crate::cache::hot::FillOutcome;
use crate::cache::{CacheTier, TieredCache};
use crate::zip::ZipCode;

/// Outcome summary of one warm-up pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmUpReport {
    /// ZIPs submitted, including rejects
    pub requested: usize,
    /// Slots this pass actually filled
    pub warmed: usize,
    /// ZIPs already resident in a tier
    pub already_warm: usize,
    /// Well-formed ZIPs absent from the mapping table
    pub not_found: usize,
    /// Inputs rejected by format validation
    pub invalid: usize,
}

impl WarmUpReport {
    /// True when every requested ZIP ended up resident.
    pub fn fully_warmed(&self) -> bool {
        self.not_found == 0 && self.invalid == 0
    }
}

/// Preloads the cache tiers from a ZIP list.
///
/// Warming is idempotent: re-warming a resident ZIP is a no-op, and two
/// passes over the same list leave the tiers in the same state as one.
pub struct CacheWarmer<'a> {
    cache: &'a TieredCache,
}

impl<'a> CacheWarmer<'a> {
    pub fn new(cache: &'a TieredCache) -> Self {
        Self { cache }
    }

    /// Warm the given ZIPs.
    pub fn warm(&self, zips: &[ZipCode]) -> WarmUpReport {
        let mut report = WarmUpReport {
            requested: zips.len(),
            ..WarmUpReport::default()
        };

        for zip in zips {
            let Some(entry) = self.cache.store().get(zip) else {
                trace!(%zip, "warm-up skipped unmapped ZIP");
                report.not_found += 1;
                continue;
            };

            match self.cache.fill_hot(*zip, entry) {
                FillOutcome::Warmed => report.warmed += 1,
                FillOutcome::AlreadyWarm => report.already_warm += 1,
                FillOutcome::NotMember => {
                    // Non-members warm the runtime tier through the normal
                    // lookup path; a cold result means this pass primed it.
                    match self.cache.lookup(zip) {
                        Some(hit) if hit.tier == CacheTier::Cold => report.warmed += 1,
                        _ => report.already_warm += 1,
                    }
                }
            }
        }

        info!(
            requested = report.requested,
            warmed = report.warmed,
            already_warm = report.already_warm,
            not_found = report.not_found,
            "cache warm-up pass finished"
        );
        report
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::store::MappingStore;
    use std::sync::Arc;

    fn zips(codes: &[&str]) -> Vec<ZipCode> {
        codes.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn cache(hot: &[&str]) -> TieredCache {
        let store = Arc::new(
            MappingStore::load_from_str(
                r#"{
                    "congress": 118,
                    "zips": {
                        "48201": { "state": "MI", "district": "12" },
                        "48226": { "state": "MI", "district": "13" },
                        "90210": { "state": "CA", "district": "36" },
                        "20001": { "state": "DC", "district": "00" }
                    }
                }"#,
            )
            .unwrap(),
        );
        let config = CacheConfig {
            hot_zips: zips(hot),
            runtime_capacity: 8,
        };
        TieredCache::new(store, &config)
    }

    #[test]
    fn test_warm_fills_hot_members() {
        let cache = cache(&["48201", "90210"]);
        let report = CacheWarmer::new(&cache).warm(&zips(&["48201", "90210"]));

        assert_eq!(report.warmed, 2);
        assert_eq!(report.already_warm, 0);
        assert!(report.fully_warmed());
        assert_eq!(cache.hot().len(), 2);
        // member warming bypasses the runtime tier
        assert_eq!(cache.runtime().len(), 0);
    }

    #[test]
    fn test_warm_routes_non_members_to_runtime() {
        let cache = cache(&["48201"]);
        let report = CacheWarmer::new(&cache).warm(&zips(&["48226", "20001"]));

        assert_eq!(report.warmed, 2);
        assert_eq!(cache.hot().len(), 0);
        assert_eq!(cache.runtime().len(), 2);
    }

    #[test]
    fn test_warm_is_idempotent() {
        let cache = cache(&["48201"]);
        let warmer = CacheWarmer::new(&cache);
        let list = zips(&["48201", "48226", "90210"]);

        let first = warmer.warm(&list);
        assert_eq!(first.warmed, 3);

        let second = warmer.warm(&list);
        assert_eq!(second.warmed, 0);
        assert_eq!(second.already_warm, 3);

        // tier state identical after the second pass
        assert_eq!(cache.hot().len(), 1);
        assert_eq!(cache.runtime().len(), 2);
    }

    #[test]
    fn test_warm_counts_unmapped_zips() {
        let cache = cache(&[]);
        let report = CacheWarmer::new(&cache).warm(&zips(&["48201", "99999"]));

        assert_eq!(report.requested, 2);
        assert_eq!(report.warmed, 1);
        assert_eq!(report.not_found, 1);
        assert!(!report.fully_warmed());
    }

    #[test]
    fn test_warm_empty_list() {
        let cache = cache(&["48201"]);
        let report = CacheWarmer::new(&cache).warm(&[]);
        assert_eq!(report, WarmUpReport::default());
    }
}
