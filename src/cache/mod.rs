//! Tiered lookup cache.
//!
//! # Design
//!
//! Three read paths sit in front of the mapping store, cheapest first:
//!
//! 1. **Hot tier** ([`hot::HotCache`]): a fixed set of high-traffic ZIPs,
//!    filled only by explicit warm-up. Never evicts, never changes shape
//!    under load.
//! 2. **Runtime tier** ([`runtime::RuntimeCache`]): a bounded LRU that
//!    absorbs whatever the current traffic pattern is.
//! 3. **Store fallthrough**: the frozen table itself, with a back-fill
//!    into the runtime tier on the way out.
//!
//! State-only queries skip all of the above and hit the derived prefix
//! range table instead, trading district precision for a lookup that is a
//! single binary search.

pub mod entry;
pub mod hot;
mod lru;
pub mod runtime;
pub mod tiered;

pub use entry::CachedZip;
pub use hot::{default_hot_zips, HotCache};
pub use runtime::RuntimeCache;
pub use tiered::{CacheConfig, CacheDiagnostics, CacheHit, CacheTier, TieredCache};

/// Default runtime tier capacity in entries. Sized to hold a metro area's
/// worth of active ZIPs with room to spare.
pub const DEFAULT_RUNTIME_CAPACITY: usize = 1024;

// ============================================================================
// Tests
// ============================================================================
