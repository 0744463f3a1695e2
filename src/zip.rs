//! Validated ZIP code key type.
//!
//! `ZipCode` is the key every cache tier and the mapping table index on.
//! Construction enforces the accepted input shapes (`NNNNN` and
//! `NNNNN-NNNN`); once a value exists it is known to be five ASCII digits,
//! so downstream code never re-validates. The ZIP+4 suffix carries no
//! district information at ZIP granularity and is discarded during parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A validated 5-digit ZIP code.
///
/// Stored as raw ASCII digits: `Copy`, hashable, and ordered the same way
/// the numeric value orders (fixed-width digit strings sort numerically).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZipCode([u8; 5]);

impl ZipCode {
    /// Parse a ZIP from caller input.
    ///
    /// Accepts exactly `NNNNN` or `NNNNN-NNNN`. Whitespace is not trimmed;
    /// callers own any cleanup of user-typed strings. The +4 add-on, when
    /// present, is validated and then dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let bytes = input.as_bytes();
        let shape_ok = match bytes.len() {
            5 => bytes.iter().all(u8::is_ascii_digit),
            10 => {
                bytes[..5].iter().all(u8::is_ascii_digit)
                    && bytes[5] == b'-'
                    && bytes[6..].iter().all(u8::is_ascii_digit)
            }
            _ => false,
        };

        if !shape_ok {
            return Err(Error::InvalidZipFormat {
                input: input.to_string(),
            });
        }

        let mut digits = [0u8; 5];
        digits.copy_from_slice(&bytes[..5]);
        Ok(Self(digits))
    }

    /// The five digits as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII digits
        std::str::from_utf8(&self.0).unwrap()
    }

    /// Numeric value in `0..=99999`.
    #[inline]
    pub fn to_u32(self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'))
    }

    /// Leading three digits (`0..=999`), the sectional center prefix that
    /// ZIP allocation groups by state on.
    #[inline]
    pub fn prefix(self) -> u16 {
        (self.to_u32() / 100) as u16
    }
}

impl FromStr for ZipCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZipCode({})", self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
