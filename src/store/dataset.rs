//! Dataset schema and record validation.
//!
//! The mapping dataset is a single JSON document:
//!
//! ```json
//! {
//!   "congress": 118,
//!   "zips": {
//!     "48201": { "state": "MI", "district": "12" },
//!     "01007": { "state": "MA", "districts": ["01", "02"] },
//!     "30318": { "state": "GA", "districts": ["05", "11"], "primary": "11" }
//!   }
//! }
//! ```
//!
//! Single-district ZIPs use `district`; split ZIPs list every candidate in
//! `districts`, first entry primary unless `primary` overrides it. Any
//! malformed record fails the whole load. A table that loaded halfway would
//! silently misroute constituents, so there is no lenient mode.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::district::{DistrictNumber, DistrictRef, StateCode, ZipEntry};
use crate::error::{Error, Result};
use crate::zip::ZipCode;

/// Top-level dataset document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDataset {
    /// Congress the district boundaries belong to (e.g. 118)
    pub congress: u16,
    /// ZIP key to record table
    pub zips: BTreeMap<String, RawZipRecord>,
}

/// One ZIP record as it appears on disk, prior to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawZipRecord {
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub districts: Option<Vec<String>>,
    /// District number to mark primary instead of the first listed
    #[serde(default)]
    pub primary: Option<String>,
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::DatasetInvalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Validate one record into its table form.
pub(crate) fn validate(key: &str, record: &RawZipRecord) -> Result<(ZipCode, ZipEntry)> {
    // Dataset keys are bare 5-digit ZIPs; the +4 form is caller input only.
    if key.len() != 5 {
        return Err(invalid(key, "ZIP key must be exactly 5 digits"));
    }
    let zip = ZipCode::parse(key).map_err(|_| invalid(key, "ZIP key must be exactly 5 digits"))?;

    let state = match &record.state {
        Some(raw) => StateCode::parse(raw)
            .ok_or_else(|| invalid(key, format!("unknown state code {raw:?}")))?,
        None => return Err(invalid(key, "missing state field")),
    };

    let numbers = district_numbers(key, record)?;
    let primary_index = primary_index(key, record, &numbers)?;

    let districts = numbers
        .into_iter()
        .enumerate()
        .map(|(i, number)| {
            if i == primary_index {
                DistrictRef::primary(state, number)
            } else {
                DistrictRef::new(state, number)
            }
        })
        .collect();

    Ok((zip, ZipEntry::new(districts)))
}

/// Extract the candidate district numbers, declaration order preserved.
fn district_numbers(key: &str, record: &RawZipRecord) -> Result<Vec<DistrictNumber>> {
    let raw: Vec<&str> = match (&record.district, &record.districts) {
        (Some(single), None) => vec![single.as_str()],
        (None, Some(list)) => list.iter().map(String::as_str).collect(),
        (Some(_), Some(_)) => {
            return Err(invalid(key, "record sets both district and districts"))
        }
        (None, None) => return Err(invalid(key, "missing district field")),
    };

    if raw.is_empty() {
        return Err(invalid(key, "districts list is empty"));
    }

    let mut numbers = Vec::with_capacity(raw.len());
    for s in raw {
        let number = DistrictNumber::parse(s)
            .ok_or_else(|| invalid(key, format!("district {s:?} is not in 00..=99")))?;
        if numbers.contains(&number) {
            return Err(invalid(key, format!("duplicate district {number}")));
        }
        numbers.push(number);
    }
    Ok(numbers)
}

/// Index of the primary candidate: the `primary` override when present,
/// otherwise the first listed.
fn primary_index(
    key: &str,
    record: &RawZipRecord,
    numbers: &[DistrictNumber],
) -> Result<usize> {
    let Some(raw) = &record.primary else {
        return Ok(0);
    };
    if record.districts.is_none() {
        return Err(invalid(key, "primary only applies to multi-district records"));
    }
    let wanted = DistrictNumber::parse(raw)
        .ok_or_else(|| invalid(key, format!("primary {raw:?} is not in 00..=99")))?;
    numbers
        .iter()
        .position(|n| *n == wanted)
        .ok_or_else(|| invalid(key, format!("primary {wanted} is not a listed district")))
}

// ============================================================================
// Tests
// ============================================================================
