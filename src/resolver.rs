//! The public resolution API.
//!
//! [`Resolver`] is the single entry point callers use: it validates input,
//! walks the cache tiers, records metrics, and maps misses to typed
//! errors. One resolver serves arbitrarily many threads; all interior
//! state is the lock-free or mutex-guarded machinery of its parts.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, trace};

use crate::cache::{CacheConfig, CacheDiagnostics, TieredCache};
use crate::district::{DistrictRef, StateCode, ZipEntry};
use crate::error::{Error, Result};
use crate::metrics::{MetricsSnapshot, ResolverMetrics};
use crate::store::{CoverageStats, MappingStore};
use crate::warmer::{CacheWarmer, WarmUpReport};
use crate::zip::ZipCode;

/// Full resolution result for one ZIP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Candidate districts in dataset declaration order
    pub districts: Vec<DistrictRef>,
    pub is_multi_district: bool,
}

/// ZIP to congressional district resolver.
pub struct Resolver {
    cache: TieredCache,
    metrics: Arc<ResolverMetrics>,
}

impl Resolver {
    /// Build a resolver over a loaded mapping table.
    pub fn new(store: MappingStore, config: CacheConfig) -> Self {
        Self::with_metrics(store, config, Arc::new(ResolverMetrics::new()))
    }

    /// Build with an injected metrics collector, for callers that observe
    /// several resolvers through one collector or assert on counters in
    /// isolation.
    pub fn with_metrics(
        store: MappingStore,
        config: CacheConfig,
        metrics: Arc<ResolverMetrics>,
    ) -> Self {
        let store = Arc::new(store);
        info!(
            zips = store.len(),
            congress = store.congress(),
            hot_members = config.hot_zips.len(),
            runtime_capacity = config.runtime_capacity,
            "resolver ready"
        );
        Self {
            cache: TieredCache::new(store, &config),
            metrics,
        }
    }

    /// Embedded dataset, default cache configuration.
    pub fn from_embedded() -> Result<Self> {
        Ok(Self::new(MappingStore::load()?, CacheConfig::default()))
    }

    /// The representative district for a ZIP.
    ///
    /// For multi-district ZIPs this is the dataset's designated primary;
    /// use [`Resolver::resolve_all`] when the caller can present choices.
    pub fn resolve_primary(&self, zip: &str) -> Result<DistrictRef> {
        Ok(*self.lookup(zip)?.primary())
    }

    /// Every candidate district for a ZIP, declaration order preserved.
    pub fn resolve_all(&self, zip: &str) -> Result<Resolution> {
        let entry = self.lookup(zip)?;
        Ok(Resolution {
            districts: entry.districts().to_vec(),
            is_multi_district: entry.is_multi_district(),
        })
    }

    /// Whether a ZIP straddles more than one district.
    pub fn is_multi_district(&self, zip: &str) -> Result<bool> {
        Ok(self.lookup(zip)?.is_multi_district())
    }

    /// State-only resolution via the prefix range table. Cheaper than a
    /// full lookup and leaves the district tiers untouched. Misses when
    /// the prefix is unmapped or shared between states.
    pub fn resolve_state(&self, zip: &str) -> Result<StateCode> {
        let zip = self.parse_zip(zip)?;
        self.metrics.record_state_lookup();
        self.cache
            .state_for(&zip)
            .ok_or(Error::DistrictNotFound { zip })
    }

    /// Warm the tiers with the given ZIP strings. Malformed entries are
    /// counted and skipped, never fatal; warm-up traffic does not show up
    /// in lookup metrics.
    pub fn warm_up<I, S>(&self, zips: I) -> WarmUpReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut invalid = 0usize;
        let mut parsed = Vec::new();
        for raw in zips {
            match ZipCode::parse(raw.as_ref()) {
                Ok(zip) => parsed.push(zip),
                Err(_) => invalid += 1,
            }
        }

        let mut report = CacheWarmer::new(&self.cache).warm(&parsed);
        report.requested += invalid;
        report.invalid = invalid;
        report
    }

    /// Warm every configured hot tier member. The usual startup call.
    pub fn warm_hot_members(&self) -> WarmUpReport {
        let members: Vec<ZipCode> = self.cache.hot().members().copied().collect();
        CacheWarmer::new(&self.cache).warm(&members)
    }

    /// The metrics collector backing this resolver.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Point-in-time metrics copy.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Tier sizes and current hit rate.
    pub fn diagnostics(&self) -> CacheDiagnostics {
        self.cache.diagnostics(self.metrics.hit_rate())
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn store(&self) -> &MappingStore {
        self.cache.store()
    }

    /// Number of mapped ZIPs in the table.
    pub fn entry_count(&self) -> usize {
        self.store().len()
    }

    /// Dataset coverage statistics.
    pub fn coverage(&self) -> CoverageStats {
        self.store().coverage()
    }

    /// Validate and time one tier walk.
    fn lookup(&self, input: &str) -> Result<Arc<ZipEntry>> {
        let zip = self.parse_zip(input)?;
        let start = Instant::now();
        match self.cache.lookup(&zip) {
            Some(hit) => {
                self.metrics.record_lookup(
                    hit.tier,
                    hit.entry.is_multi_district(),
                    start.elapsed(),
                );
                trace!(%zip, tier = %hit.tier, "resolved ZIP");
                Ok(hit.entry)
            }
            None => {
                self.metrics.record_not_found(start.elapsed());
                trace!(%zip, "ZIP not in mapping table");
                Err(Error::DistrictNotFound { zip })
            }
        }
    }

    fn parse_zip(&self, input: &str) -> Result<ZipCode> {
        ZipCode::parse(input).map_err(|err| {
            self.metrics.record_invalid();
            err
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
