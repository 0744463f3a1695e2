//! District identity types.
//!
//! A resolved ZIP yields one or more [`DistrictRef`] values, each naming a
//! state (or territory) and a district number. District numbers are kept in
//! their canonical two-digit zero-padded form: `"12"` for Michigan's 12th,
//! `"00"` for at-large delegations, D.C., and the territories.

use std::fmt;

use serde::{Serialize, Serializer};

/// Every postal code the dataset may reference: the fifty states plus the
/// District of Columbia and the five inhabited territories. Sorted for
/// binary search.
const STATE_ROSTER: [&str; 56] = [
    "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA",
    "GU", "HI", "IA", "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME",
    "MI", "MN", "MO", "MP", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM",
    "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC", "SD", "TN", "TX",
    "UT", "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

/// Jurisdictions without Senate representation: D.C. and the territories.
/// Their House seat is a non-voting delegate, always district `"00"`.
const TERRITORY_CODES: [&str; 6] = ["AS", "DC", "GU", "MP", "PR", "VI"];

/// Two-letter USPS state or territory code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateCode([u8; 2]);

impl StateCode {
    /// Parse a two-letter uppercase code. Returns `None` for anything that
    /// is not on the roster, so typos in dataset records fail loading
    /// instead of shipping a phantom state.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return None;
        }
        STATE_ROSTER.binary_search(&s).ok()?;
        Some(Self([bytes[0], bytes[1]]))
    }

    /// The code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII uppercase
        std::str::from_utf8(&self.0).unwrap()
    }

    /// True for D.C. and the five territories.
    pub fn is_territory(&self) -> bool {
        TERRITORY_CODES.binary_search(&self.as_str()).is_ok()
    }

    /// Senate seats for this jurisdiction: two for every formal state,
    /// at-large states included, and zero for D.C. and the territories.
    pub fn senate_seats(&self) -> u8 {
        if self.is_territory() {
            0
        } else {
            2
        }
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCode({})", self.as_str())
    }
}

impl Serialize for StateCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Congressional district number in canonical zero-padded form.
///
/// `"00"` marks an at-large seat or a non-voting delegate seat; numbered
/// districts run `"01"` through `"99"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DistrictNumber([u8; 2]);

impl DistrictNumber {
    /// The at-large / delegate district.
    pub const AT_LARGE: DistrictNumber = DistrictNumber([b'0', b'0']);

    /// Parse a district number from a dataset string. Accepts one or two
    /// digits (`"7"` normalizes to `"07"`).
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        match bytes {
            [d] if d.is_ascii_digit() => Some(Self([b'0', *d])),
            [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some(Self([*a, *b])),
            _ => None,
        }
    }

    /// The zero-padded form as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII digits
        std::str::from_utf8(&self.0).unwrap()
    }

    /// Numeric value in `0..=99`.
    #[inline]
    pub fn value(&self) -> u8 {
        (self.0[0] - b'0') * 10 + (self.0[1] - b'0')
    }

    /// True for the `"00"` at-large / delegate district.
    #[inline]
    pub fn is_at_large(&self) -> bool {
        *self == Self::AT_LARGE
    }
}

impl fmt::Display for DistrictNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for DistrictNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DistrictNumber({})", self.as_str())
    }
}

impl Serialize for DistrictNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One candidate district for a ZIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRef {
    /// Owning state or territory
    pub state: StateCode,
    /// Zero-padded district number
    pub district: DistrictNumber,
    /// Whether this is the representative answer for single-district use
    pub is_primary: bool,
}

impl DistrictRef {
    pub fn new(state: StateCode, district: DistrictNumber) -> Self {
        Self {
            state,
            district,
            is_primary: false,
        }
    }

    pub fn primary(state: StateCode, district: DistrictNumber) -> Self {
        Self {
            state,
            district,
            is_primary: true,
        }
    }

    /// True for at-large and delegate seats.
    pub fn is_at_large(&self) -> bool {
        self.district.is_at_large()
    }
}

impl fmt::Display for DistrictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.state, self.district)
    }
}

/// The full candidate list for one ZIP, in dataset declaration order.
///
/// Invariants, enforced at dataset load:
/// - at least one candidate
/// - exactly one candidate carries `is_primary`
/// - every candidate belongs to the same state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    districts: Vec<DistrictRef>,
}

impl ZipEntry {
    pub(crate) fn new(districts: Vec<DistrictRef>) -> Self {
        debug_assert!(!districts.is_empty());
        debug_assert_eq!(districts.iter().filter(|d| d.is_primary).count(), 1);
        Self { districts }
    }

    /// The representative district for single-district consumers.
    pub fn primary(&self) -> &DistrictRef {
        self.districts
            .iter()
            .find(|d| d.is_primary)
            .unwrap_or(&self.districts[0])
    }

    /// All candidate districts, declaration order preserved.
    pub fn districts(&self) -> &[DistrictRef] {
        &self.districts
    }

    /// True when the ZIP straddles more than one district.
    pub fn is_multi_district(&self) -> bool {
        self.districts.len() > 1
    }

    /// The owning state. Candidates never cross state lines.
    pub fn state(&self) -> StateCode {
        self.districts[0].state
    }
}

// ============================================================================
// Tests
// ============================================================================
