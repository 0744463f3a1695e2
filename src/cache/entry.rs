//! Cache entry payload shared by the tiers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::district::ZipEntry;
use crate::zip::ZipCode;

/// A resolved ZIP held in a cache tier.
///
/// The candidate list is the same `Arc` the mapping store holds, so a
/// cached entry costs a pointer and a timestamp, not a copy of the data.
#[derive(Debug, Clone)]
pub struct CachedZip {
    pub zip: ZipCode,
    pub entry: Arc<ZipEntry>,
    /// When the entry landed in its tier
    pub inserted_at: Instant,
}

impl CachedZip {
    pub fn new(zip: ZipCode, entry: Arc<ZipEntry>) -> Self {
        Self {
            zip,
            entry,
            inserted_at: Instant::now(),
        }
    }

    /// Time since the entry was cached.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }
}

// ============================================================================
// Tests
// ============================================================================
