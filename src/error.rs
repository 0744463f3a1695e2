//! Error types for the district resolver.

use thiserror::Error;

use crate::zip::ZipCode;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by lookup operations and dataset loading.
///
/// Three failure classes with different recovery stories:
///
/// - [`Error::InvalidZipFormat`]: caller error, recoverable by correcting
///   the input before retrying
/// - [`Error::DistrictNotFound`]: well-formed ZIP with no mapping entry;
///   callers fall back to address-level geocoding
/// - dataset errors ([`Error::DatasetIo`], [`Error::DatasetParse`],
///   [`Error::DatasetInvalid`]): fatal at startup, the resolver refuses
///   to serve from a partial table
#[derive(Error, Debug)]
pub enum Error {
    /// Input does not match the `NNNNN` or `NNNNN-NNNN` ZIP shape
    #[error("invalid ZIP code format: {input:?}")]
    InvalidZipFormat { input: String },

    /// Valid 5-digit ZIP with no entry in the mapping table
    #[error("no district mapping for ZIP {zip}")]
    DistrictNotFound { zip: ZipCode },

    /// Dataset file could not be read
    #[error("failed to read dataset: {0}")]
    DatasetIo(#[from] std::io::Error),

    /// Dataset is not valid JSON
    #[error("failed to parse dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),

    /// Dataset decoded but a record failed validation
    #[error("invalid dataset record for key {key:?}: {reason}")]
    DatasetInvalid { key: String, reason: String },
}

impl Error {
    /// True for the dataset failure class. These abort startup instead of
    /// degrading into partial answers.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::DatasetIo(_) | Error::DatasetParse(_) | Error::DatasetInvalid { .. }
        )
    }

    /// True when the caller should route the request to a fallback
    /// geocoding path rather than reject the input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::DistrictNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
