//! zipdist - ZIP Code to Congressional District Resolver
//!
//! Resolves US ZIP codes to congressional districts from an immutable
//! in-memory mapping table, with a tiered cache in front of it and a
//! metrics collector watching every lookup. District boundaries change
//! once per redistricting cycle, so the table loads once at startup and
//! freezes; all the engineering lives in serving lookups fast.
//!
//! # Architecture
//!
//! ```text
//! Resolver (API) → Tiered Cache (hot / runtime / state) → Mapping Store
//!                        ↑
//!                  Cache Warmer (explicit preload)
//! ```
//!
//! # Features
//!
//! - Validated ZIP input (`NNNNN` and `NNNNN-NNNN`, +4 suffix ignored)
//! - Multi-district ZIP support with a designated primary
//! - Pinned hot tier, bounded LRU runtime tier, prefix-range state table
//! - Lock-free lookup metrics with an EMA latency average
//! - Idempotent cache warm-up
//!
//! # Modules
//!
//! - [`cache`] - Hot, runtime, and state cache tiers
//! - [`district`] - District and state identity types
//! - [`error`] - Error types
//! - [`metrics`] - Lookup counters and latency tracking
//! - [`resolver`] - The public resolution API
//! - [`store`] - The frozen mapping table and derived state ranges
//! - [`warmer`] - Explicit cache preloading
//! - [`zip`] - Validated ZIP code keys

pub mod cache;
pub mod district;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod store;
pub mod warmer;
pub mod zip;

mod proptest;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheDiagnostics, CacheTier, TieredCache};
pub use district::{DistrictNumber, DistrictRef, StateCode, ZipEntry};
pub use error::{Error, Result};
pub use metrics::{MetricsSnapshot, ResolverMetrics};
pub use resolver::{Resolution, Resolver};
pub use store::{CoverageStats, MappingStore};
pub use warmer::{CacheWarmer, WarmUpReport};
pub use zip::ZipCode;

/// Crate version, as compiled.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
