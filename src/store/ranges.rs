//! State lookup by ZIP prefix ranges.
//!
//! USPS allocates ZIPs to states in blocks of three-digit prefixes, so a
//! state-only query does not need the full table: a handful of contiguous
//! prefix ranges answers it. The ranges are derived from the mapping table
//! at startup and frozen alongside it.
//!
//! A prefix observed under more than one state (the Pacific territories
//! share 969 with each other, for example) is excluded rather than guessed;
//! those ZIPs still resolve through the full district path.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::district::StateCode;
use crate::store::MappingStore;
use crate::zip::ZipCode;

/// One contiguous run of three-digit prefixes owned by a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRange {
    /// First prefix in the run, inclusive
    pub lo: u16,
    /// Last prefix in the run, inclusive
    pub hi: u16,
    pub state: StateCode,
}

/// Sorted, non-overlapping prefix ranges for state-only lookups.
pub struct StateRanges {
    ranges: Vec<StateRange>,
}

impl StateRanges {
    /// Derive the range table from a loaded mapping table.
    pub fn build(store: &MappingStore) -> Self {
        // BTreeMap keeps prefixes sorted for the merge pass.
        // None marks a prefix claimed by more than one state.
        let mut by_prefix: BTreeMap<u16, Option<StateCode>> = BTreeMap::new();
        for (zip, entry) in store.iter() {
            let state = entry.state();
            by_prefix
                .entry(zip.prefix())
                .and_modify(|owner| {
                    if *owner != Some(state) {
                        *owner = None;
                    }
                })
                .or_insert(Some(state));
        }

        let mut ranges: Vec<StateRange> = Vec::new();
        for (prefix, owner) in by_prefix {
            let Some(state) = owner else {
                warn!(prefix, "ZIP prefix claimed by multiple states, excluded from state table");
                continue;
            };
            match ranges.last_mut() {
                Some(last) if last.state == state && last.hi + 1 == prefix => last.hi = prefix,
                _ => ranges.push(StateRange {
                    lo: prefix,
                    hi: prefix,
                    state,
                }),
            }
        }

        debug!(ranges = ranges.len(), "built state prefix range table");
        Self { ranges }
    }

    /// State owning the ZIP's prefix, if the prefix is covered.
    pub fn state_for(&self, zip: &ZipCode) -> Option<StateCode> {
        let prefix = zip.prefix();
        self.ranges
            .binary_search_by(|range| {
                if range.hi < prefix {
                    Ordering::Less
                } else if range.lo > prefix {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|i| self.ranges[i].state)
    }

    /// Number of ranges in the table.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[StateRange] {
        &self.ranges
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store(json: &str) -> MappingStore {
        MappingStore::load_from_str(json).unwrap()
    }

    fn lookup(ranges: &StateRanges, zip: &str) -> Option<String> {
        ranges
            .state_for(&zip.parse().unwrap())
            .map(|s| s.as_str().to_string())
    }

    #[test]
    fn test_adjacent_prefixes_merge() {
        let store = store(
            r#"{
                "congress": 118,
                "zips": {
                    "48104": { "state": "MI", "district": "06" },
                    "48201": { "state": "MI", "district": "12" },
                    "48310": { "state": "MI", "district": "10" },
                    "49503": { "state": "MI", "district": "03" }
                }
            }"#,
        );
        let ranges = StateRanges::build(&store);

        // 481..483 merge into one run; 495 stands alone across the gap
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.ranges()[0].lo, 481);
        assert_eq!(ranges.ranges()[0].hi, 483);
        assert_eq!(ranges.ranges()[1].lo, 495);
        assert_eq!(ranges.ranges()[1].hi, 495);
    }

    #[test]
    fn test_lookup_inside_and_outside_ranges() {
        let store = store(
            r#"{
                "congress": 118,
                "zips": {
                    "48104": { "state": "MI", "district": "06" },
                    "48201": { "state": "MI", "district": "12" },
                    "90210": { "state": "CA", "district": "36" }
                }
            }"#,
        );
        let ranges = StateRanges::build(&store);

        assert_eq!(lookup(&ranges, "48104").as_deref(), Some("MI"));
        // any ZIP in a covered prefix resolves, not only the sampled ones
        assert_eq!(lookup(&ranges, "48199").as_deref(), Some("MI"));
        assert_eq!(lookup(&ranges, "90299").as_deref(), Some("CA"));
        // uncovered prefix
        assert_eq!(lookup(&ranges, "60601"), None);
    }

    #[test]
    fn test_conflicting_prefix_is_excluded() {
        // Guam and the Northern Marianas share prefix 969
        let store = store(
            r#"{
                "congress": 118,
                "zips": {
                    "96910": { "state": "GU", "district": "00" },
                    "96950": { "state": "MP", "district": "00" },
                    "96813": { "state": "HI", "district": "01" }
                }
            }"#,
        );
        let ranges = StateRanges::build(&store);

        assert_eq!(ranges.len(), 1);
        assert_eq!(lookup(&ranges, "96813").as_deref(), Some("HI"));
        // conflicted prefix answers nothing rather than guessing
        assert_eq!(lookup(&ranges, "96910"), None);
        assert_eq!(lookup(&ranges, "96950"), None);
    }

    #[test]
    fn test_same_state_conflict_is_not_a_conflict() {
        // two districts in one prefix still yield an unambiguous state
        let store = store(
            r#"{
                "congress": 118,
                "zips": {
                    "48201": { "state": "MI", "district": "12" },
                    "48226": { "state": "MI", "district": "13" }
                }
            }"#,
        );
        let ranges = StateRanges::build(&store);
        assert_eq!(ranges.len(), 1);
        assert_eq!(lookup(&ranges, "48204").as_deref(), Some("MI"));
    }

    #[test]
    fn test_interleaved_states_split_ranges() {
        // D.C. and Northern Virginia interleave around prefix 201
        let store = store(
            r#"{
                "congress": 118,
                "zips": {
                    "20001": { "state": "DC", "district": "00" },
                    "20101": { "state": "VA", "district": "10" },
                    "20500": { "state": "DC", "district": "00" }
                }
            }"#,
        );
        let ranges = StateRanges::build(&store);

        assert_eq!(ranges.len(), 3);
        assert_eq!(lookup(&ranges, "20001").as_deref(), Some("DC"));
        assert_eq!(lookup(&ranges, "20101").as_deref(), Some("VA"));
        assert_eq!(lookup(&ranges, "20500").as_deref(), Some("DC"));
    }

    #[test]
    fn test_embedded_dataset_ranges() {
        let store = MappingStore::load().unwrap();
        let ranges = StateRanges::build(&store);

        assert!(!ranges.is_empty());
        assert_eq!(lookup(&ranges, "90210").as_deref(), Some("CA"));
        assert_eq!(lookup(&ranges, "20001").as_deref(), Some("DC"));
        assert_eq!(lookup(&ranges, "00601").as_deref(), Some("PR"));
    }
}
