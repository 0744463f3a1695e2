//! Lookup metrics.
//!
//! All counters are relaxed atomics: readers tolerate slightly stale
//! values, and nothing here may slow the lookup path down. The latency
//! average is an exponential moving average so it tracks current behavior
//! without storing samples; it is kept in nanoseconds because cache hits
//! routinely complete in well under a microsecond.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::cache::CacheTier;

/// EMA weight for new latency samples.
const LATENCY_EMA_ALPHA: f64 = 0.1;

/// Counters and latency tracking for the resolver.
///
/// Shared behind an `Arc`; one collector can be injected into a resolver
/// to observe it externally, or left to the resolver's own default.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Valid-format lookups, hits and misses alike
    total_lookups: AtomicU64,
    hot_hits: AtomicU64,
    runtime_hits: AtomicU64,
    cold_lookups: AtomicU64,
    not_found: AtomicU64,
    /// Rejected before reaching the cache; not part of total_lookups
    invalid_zip: AtomicU64,
    multi_district_lookups: AtomicU64,
    state_lookups: AtomicU64,
    avg_latency_ns: AtomicU64,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup that found an entry.
    pub(crate) fn record_lookup(&self, tier: CacheTier, multi_district: bool, latency: Duration) {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        match tier {
            CacheTier::Hot => self.hot_hits.fetch_add(1, Ordering::Relaxed),
            CacheTier::Runtime => self.runtime_hits.fetch_add(1, Ordering::Relaxed),
            CacheTier::Cold => self.cold_lookups.fetch_add(1, Ordering::Relaxed),
        };
        if multi_district {
            self.multi_district_lookups.fetch_add(1, Ordering::Relaxed);
        }
        self.update_latency_ema(latency);
    }

    /// Record a well-formed lookup with no mapping entry.
    pub(crate) fn record_not_found(&self, latency: Duration) {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        self.not_found.fetch_add(1, Ordering::Relaxed);
        self.update_latency_ema(latency);
    }

    /// Record an input rejected by format validation.
    pub(crate) fn record_invalid(&self) {
        self.invalid_zip.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a state-only lookup.
    pub(crate) fn record_state_lookup(&self) {
        self.state_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_lookups(&self) -> u64 {
        self.total_lookups.load(Ordering::Relaxed)
    }

    pub fn hot_hits(&self) -> u64 {
        self.hot_hits.load(Ordering::Relaxed)
    }

    pub fn runtime_hits(&self) -> u64 {
        self.runtime_hits.load(Ordering::Relaxed)
    }

    pub fn cold_lookups(&self) -> u64 {
        self.cold_lookups.load(Ordering::Relaxed)
    }

    pub fn not_found(&self) -> u64 {
        self.not_found.load(Ordering::Relaxed)
    }

    pub fn invalid_zip(&self) -> u64 {
        self.invalid_zip.load(Ordering::Relaxed)
    }

    pub fn multi_district_lookups(&self) -> u64 {
        self.multi_district_lookups.load(Ordering::Relaxed)
    }

    pub fn state_lookups(&self) -> u64 {
        self.state_lookups.load(Ordering::Relaxed)
    }

    /// Lookups answered by a cache tier without touching the store.
    pub fn direct_hits(&self) -> u64 {
        self.hot_hits() + self.runtime_hits()
    }

    /// Fraction of lookups served by the hot and runtime tiers. Zero when
    /// nothing has been recorded.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_lookups();
        if total == 0 {
            return 0.0;
        }
        self.direct_hits() as f64 / total as f64
    }

    /// Moving average lookup latency.
    pub fn average_response_time(&self) -> Duration {
        Duration::from_nanos(self.avg_latency_ns.load(Ordering::Relaxed))
    }

    /// Consistent-enough copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_lookups: self.total_lookups(),
            direct_hits: self.direct_hits(),
            hot_hits: self.hot_hits(),
            runtime_hits: self.runtime_hits(),
            cold_lookups: self.cold_lookups(),
            not_found: self.not_found(),
            invalid_zip: self.invalid_zip(),
            multi_district_lookups: self.multi_district_lookups(),
            state_lookups: self.state_lookups(),
            average_response_time: self.average_response_time(),
            hit_rate: self.hit_rate(),
        }
    }

    /// Zero every counter and the latency average.
    pub fn reset(&self) {
        self.total_lookups.store(0, Ordering::Relaxed);
        self.hot_hits.store(0, Ordering::Relaxed);
        self.runtime_hits.store(0, Ordering::Relaxed);
        self.cold_lookups.store(0, Ordering::Relaxed);
        self.not_found.store(0, Ordering::Relaxed);
        self.invalid_zip.store(0, Ordering::Relaxed);
        self.multi_district_lookups.store(0, Ordering::Relaxed);
        self.state_lookups.store(0, Ordering::Relaxed);
        self.avg_latency_ns.store(0, Ordering::Relaxed);
    }

    /// Fold a sample into the EMA with a CAS loop. Contending writers
    /// retry against whichever value won.
    fn update_latency_ema(&self, latency: Duration) {
        let sample = latency.as_nanos().min(u128::from(u64::MAX)) as u64;
        let mut current = self.avg_latency_ns.load(Ordering::Relaxed);
        loop {
            let updated = if current == 0 {
                sample
            } else {
                (sample as f64 * LATENCY_EMA_ALPHA
                    + current as f64 * (1.0 - LATENCY_EMA_ALPHA)) as u64
            };
            match self.avg_latency_ns.compare_exchange_weak(
                current,
                updated,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

/// Point-in-time copy of the collector, shaped for the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_lookups: u64,
    pub direct_hits: u64,
    pub hot_hits: u64,
    pub runtime_hits: u64,
    pub cold_lookups: u64,
    pub not_found: u64,
    pub invalid_zip: u64,
    pub multi_district_lookups: u64,
    pub state_lookups: u64,
    /// Reported as fractional milliseconds
    #[serde(serialize_with = "duration_as_millis")]
    pub average_response_time: Duration,
    pub hit_rate: f64,
}

fn duration_as_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1_000.0)
}

// ============================================================================
// Tests
// ============================================================================
