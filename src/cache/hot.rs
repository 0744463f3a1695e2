//! Hot tier: pinned high-traffic ZIPs.
//!
//! Membership is fixed when the cache is built, from a curated list of the
//! highest-traffic ZIPs. Slots are filled only by an explicit warm-up pass;
//! ordinary lookups read the tier but never write it, and nothing is ever
//! evicted. The result is a tier whose contents are fully predictable: a
//! member ZIP is either warmed or it falls through to the tiers below.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::district::ZipEntry;
use crate::zip::ZipCode;

/// Default hot membership: dense urban ZIPs that dominate lookup traffic,
/// plus the capital districts civic tooling queries constantly.
const DEFAULT_HOT_ZIPS: [&str; 16] = [
    "10001", // Manhattan
    "11201", // Brooklyn
    "60601", // Chicago Loop
    "77002", // Houston
    "85004", // Phoenix
    "19102", // Philadelphia
    "78205", // San Antonio
    "92101", // San Diego
    "75201", // Dallas
    "95814", // Sacramento
    "90001", // Los Angeles
    "90210", // Beverly Hills
    "20001", // Washington D.C.
    "48201", // Detroit
    "02139", // Cambridge
    "98104", // Seattle
];

static DEFAULT_MEMBERS: Lazy<Vec<ZipCode>> = Lazy::new(|| {
    DEFAULT_HOT_ZIPS
        .iter()
        .map(|s| s.parse().expect("built-in hot ZIP list is valid"))
        .collect()
});

/// The built-in hot membership list.
pub fn default_hot_zips() -> &'static [ZipCode] {
    &DEFAULT_MEMBERS
}

/// Outcome of a warm-up write against the hot tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillOutcome {
    /// Slot was empty and is now warm
    Warmed,
    /// Slot was already warm, left untouched
    AlreadyWarm,
    /// ZIP is not in the membership set
    NotMember,
}

/// Fixed-membership, warm-up-filled cache tier.
pub struct HotCache {
    members: HashSet<ZipCode>,
    slots: DashMap<ZipCode, Arc<ZipEntry>>,
}

impl HotCache {
    pub fn new(members: impl IntoIterator<Item = ZipCode>) -> Self {
        let members: HashSet<ZipCode> = members.into_iter().collect();
        let slots = DashMap::with_capacity(members.len());
        Self { members, slots }
    }

    /// Entry for a warmed member ZIP. Non-members and unwarmed members
    /// both miss.
    pub fn get(&self, zip: &ZipCode) -> Option<Arc<ZipEntry>> {
        self.slots.get(zip).map(|entry| entry.clone())
    }

    /// Whether the ZIP belongs to the fixed membership set.
    pub fn is_member(&self, zip: &ZipCode) -> bool {
        self.members.contains(zip)
    }

    /// The fixed membership set, iteration order unspecified.
    pub fn members(&self) -> impl Iterator<Item = &ZipCode> + '_ {
        self.members.iter()
    }

    /// Fill a member slot. First writer wins; refills are no-ops, which is
    /// what makes warm-up idempotent.
    pub(crate) fn fill(&self, zip: ZipCode, entry: Arc<ZipEntry>) -> FillOutcome {
        if !self.members.contains(&zip) {
            return FillOutcome::NotMember;
        }
        match self.slots.entry(zip) {
            dashmap::mapref::entry::Entry::Occupied(_) => FillOutcome::AlreadyWarm,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(entry);
                FillOutcome::Warmed
            }
        }
    }

    /// Size of the fixed membership set.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of warmed slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
