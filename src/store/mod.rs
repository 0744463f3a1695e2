//! Mapping store: the authoritative ZIP to district table.
//!
//! # Design
//!
//! The store is the cold source of truth under the cache tiers. It loads a
//! JSON dataset once at startup, validates every record, and freezes. There
//! is no refresh path: district boundaries change once per redistricting
//! cycle, and a new table ships as a new dataset.
//!
//! - [`mapping::MappingStore`]: the frozen ZIP table
//! - [`ranges::StateRanges`]: prefix ranges derived from it for
//!   state-only queries

pub mod dataset;
pub mod mapping;
pub mod ranges;

pub use mapping::{CoverageStats, MappingStore};
pub use ranges::{StateRange, StateRanges};
