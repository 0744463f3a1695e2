//! Immutable ZIP to district mapping table.
//!
//! The table is built once at startup and never mutated afterwards, so
//! readers share it without locks. Loading is all-or-nothing: any invalid
//! record aborts the load and the process refuses to serve.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::district::ZipEntry;
use crate::error::{Error, Result};
use crate::store::dataset::{self, RawDataset};
use crate::zip::ZipCode;

/// Dataset compiled into the binary. A deployment can override it with
/// `MappingStore::load_from_path`.
const EMBEDDED_DATASET: &str = include_str!("../../data/zip_districts.json");

/// The frozen ZIP to district table.
///
/// Entries are held behind `Arc` so cache tiers share them with the store
/// instead of copying candidate lists around.
#[derive(Debug)]
pub struct MappingStore {
    congress: u16,
    entries: BTreeMap<ZipCode, Arc<ZipEntry>>,
}

impl MappingStore {
    /// Load the embedded dataset.
    pub fn load() -> Result<Self> {
        Self::load_from_str(EMBEDDED_DATASET)
    }

    /// Load a dataset from a JSON file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::load_from_str(&raw)
    }

    /// Parse and validate a dataset document.
    pub fn load_from_str(raw: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(raw)?;

        let mut entries = BTreeMap::new();
        for (key, record) in &raw.zips {
            let (zip, entry) = dataset::validate(key, record)?;
            entries.insert(zip, Arc::new(entry));
        }

        if entries.is_empty() {
            return Err(Error::DatasetInvalid {
                key: String::new(),
                reason: "dataset contains no ZIP records".to_string(),
            });
        }

        info!(
            congress = raw.congress,
            zips = entries.len(),
            "loaded district mapping table"
        );

        Ok(Self {
            congress: raw.congress,
            entries,
        })
    }

    /// Entry for a ZIP, if mapped. The returned `Arc` is shared with the
    /// table, not copied.
    pub fn get(&self, zip: &ZipCode) -> Option<Arc<ZipEntry>> {
        self.entries.get(zip).cloned()
    }

    pub fn contains(&self, zip: &ZipCode) -> bool {
        self.entries.contains_key(zip)
    }

    /// Ordered iteration over the whole table.
    pub fn iter(&self) -> impl Iterator<Item = (&ZipCode, &ZipEntry)> {
        self.entries.iter().map(|(zip, entry)| (zip, entry.as_ref()))
    }

    /// Ordered iteration over the mapped ZIPs alone.
    pub fn zips(&self) -> impl Iterator<Item = &ZipCode> {
        self.entries.keys()
    }

    /// Congress the boundaries belong to.
    pub fn congress(&self) -> u16 {
        self.congress
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summary statistics over the loaded table.
    pub fn coverage(&self) -> CoverageStats {
        let states: BTreeSet<_> = self.entries.values().map(|e| e.state()).collect();
        CoverageStats {
            congress: self.congress,
            zip_count: self.entries.len(),
            multi_district_count: self
                .entries
                .values()
                .filter(|e| e.is_multi_district())
                .count(),
            state_count: states.len(),
        }
    }
}

/// Dataset coverage summary, reported by the CLI and startup logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub congress: u16,
    pub zip_count: usize,
    pub multi_district_count: usize,
    pub state_count: usize,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn small_dataset() -> MappingStore {
        MappingStore::load_from_str(
            r#"{
                "congress": 118,
                "zips": {
                    "48201": { "state": "MI", "district": "12" },
                    "48226": { "state": "MI", "district": "13" },
                    "01007": { "state": "MA", "districts": ["01", "02"] },
                    "82001": { "state": "WY", "district": "00" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_load_embedded_dataset() {
        let store = MappingStore::load().unwrap();
        assert!(store.len() > 100);
        assert_eq!(store.congress(), 118);
        // every state plus D.C. and the five territories
        assert_eq!(store.coverage().state_count, 56);
    }

    #[test]
    fn test_get_present_and_absent() {
        let store = small_dataset();
        let zip = "48201".parse().unwrap();
        let entry = store.get(&zip).unwrap();
        assert_eq!(entry.primary().to_string(), "MI-12");

        let missing = "99999".parse().unwrap();
        assert!(store.get(&missing).is_none());
        assert!(!store.contains(&missing));
    }

    #[test]
    fn test_get_shares_entry_allocation() {
        let store = small_dataset();
        let zip = "48201".parse().unwrap();
        let a = store.get(&zip).unwrap();
        let b = store.get(&zip).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_iter_is_ordered() {
        let store = small_dataset();
        let zips: Vec<String> = store.iter().map(|(z, _)| z.to_string()).collect();
        assert_eq!(zips, vec!["01007", "48201", "48226", "82001"]);

        let keys: Vec<String> = store.zips().map(ToString::to_string).collect();
        assert_eq!(keys, zips);
    }

    #[test]
    fn test_coverage_counts() {
        let stats = small_dataset().coverage();
        assert_eq!(stats.zip_count, 4);
        assert_eq!(stats.multi_district_count, 1);
        assert_eq!(stats.state_count, 3);
        assert_eq!(stats.congress, 118);
    }

    #[test]
    fn test_store_debug_format() {
        // assertion macros render the store when a load expectation fails
        let rendered = format!("{:?}", small_dataset());
        assert!(rendered.contains("congress: 118"));
        assert!(rendered.contains("48201"));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        assert_matches!(
            MappingStore::load_from_str("{not json"),
            Err(Error::DatasetParse(_))
        );
    }

    #[test]
    fn test_load_rejects_empty_table() {
        assert_matches!(
            MappingStore::load_from_str(r#"{"congress": 118, "zips": {}}"#),
            Err(Error::DatasetInvalid { reason, .. }) if reason.contains("no ZIP records")
        );
    }

    #[test]
    fn test_load_fails_on_any_bad_record() {
        // one malformed record poisons the whole load
        let result = MappingStore::load_from_str(
            r#"{
                "congress": 118,
                "zips": {
                    "48201": { "state": "MI", "district": "12" },
                    "48226": { "state": "MI", "district": "1x" }
                }
            }"#,
        );
        assert_matches!(result, Err(Error::DatasetInvalid { key, .. }) if key == "48226");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        assert_matches!(
            MappingStore::load_from_path("/nonexistent/zips.json"),
            Err(Error::DatasetIo(_))
        );
    }
}
