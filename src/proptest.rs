//! Property-based tests for resolution invariants.
//!
//! These run the resolver end to end over the embedded dataset with
//! generated inputs, checking the guarantees every caller leans on:
//! candidate lists are never empty, exactly one candidate is primary,
//! input rejection never bleeds into other error classes, and the state
//! path never contradicts the district path.

#![cfg(test)]

use once_cell::sync::Lazy;
use proptest::prelude::*;

use crate::error::Error;
use crate::resolver::Resolver;
use crate::zip::ZipCode;

static RESOLVER: Lazy<Resolver> =
    Lazy::new(|| Resolver::from_embedded().expect("embedded dataset loads"));

/// Jurisdictions whose only seat is at-large or a non-voting delegate.
const AT_LARGE: [&str; 12] = [
    "AK", "AS", "DC", "DE", "GU", "MP", "ND", "PR", "SD", "VI", "VT", "WY",
];

// ============================================================================
// Strategies
// ============================================================================

/// A ZIP drawn uniformly from the embedded mapping table.
fn mapped_zip() -> impl Strategy<Value = ZipCode> {
    any::<prop::sample::Index>().prop_map(|idx| {
        let store = RESOLVER.store();
        let i = idx.index(store.len());
        store
            .iter()
            .nth(i)
            .map(|(zip, _)| *zip)
            .expect("index within table bounds")
    })
}

// ============================================================================
// Resolution invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_candidates_non_empty_with_single_primary(zip in mapped_zip()) {
        let resolution = RESOLVER.resolve_all(zip.as_str()).unwrap();
        prop_assert!(!resolution.districts.is_empty());
        prop_assert_eq!(
            resolution.districts.iter().filter(|d| d.is_primary).count(),
            1
        );
    }

    #[test]
    fn prop_multi_flag_matches_candidate_count(zip in mapped_zip()) {
        let resolution = RESOLVER.resolve_all(zip.as_str()).unwrap();
        let multi = RESOLVER.is_multi_district(zip.as_str()).unwrap();
        prop_assert_eq!(multi, resolution.districts.len() > 1);
        prop_assert_eq!(multi, resolution.is_multi_district);
    }

    #[test]
    fn prop_primary_is_among_candidates(zip in mapped_zip()) {
        let primary = RESOLVER.resolve_primary(zip.as_str()).unwrap();
        let resolution = RESOLVER.resolve_all(zip.as_str()).unwrap();
        prop_assert!(resolution.districts.contains(&primary));
    }

    #[test]
    fn prop_at_large_and_senate_consistency(zip in mapped_zip()) {
        let resolution = RESOLVER.resolve_all(zip.as_str()).unwrap();
        let state = resolution.districts[0].state;

        if AT_LARGE.contains(&state.as_str()) {
            for district in &resolution.districts {
                prop_assert!(district.is_at_large(), "{} should be at-large", district);
            }
        }

        let expected = if state.is_territory() { 0 } else { 2 };
        prop_assert_eq!(state.senate_seats(), expected);
    }

    #[test]
    fn prop_state_path_agrees_with_district_path(zip in mapped_zip()) {
        match RESOLVER.resolve_state(zip.as_str()) {
            Ok(state) => {
                let resolution = RESOLVER.resolve_all(zip.as_str()).unwrap();
                prop_assert_eq!(state, resolution.districts[0].state);
            }
            // shared or uncovered prefix; miss beats a wrong guess
            Err(Error::DistrictNotFound { .. }) => {}
            Err(err) => prop_assert!(false, "unexpected error class: {err}"),
        }
    }
}

// ============================================================================
// Input handling
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_five_digit_strings_roundtrip(s in "[0-9]{5}") {
        let zip = ZipCode::parse(&s).unwrap();
        prop_assert_eq!(zip.to_string(), s);
    }

    #[test]
    fn prop_plus_four_resolves_like_base(zip in mapped_zip(), suffix in "[0-9]{4}") {
        let full = format!("{zip}-{suffix}");
        let with_suffix = RESOLVER.resolve_primary(&full).unwrap();
        let base = RESOLVER.resolve_primary(zip.as_str()).unwrap();
        prop_assert_eq!(with_suffix, base);
    }

    #[test]
    fn prop_well_formed_input_never_invalid(s in "[0-9]{5}(-[0-9]{4})?") {
        match RESOLVER.resolve_all(&s) {
            Ok(_) | Err(Error::DistrictNotFound { .. }) => {}
            Err(err) => prop_assert!(false, "unexpected error class: {err}"),
        }
    }

    #[test]
    fn prop_arbitrary_input_never_panics(s in "\\PC{0,12}") {
        match RESOLVER.resolve_all(&s) {
            Ok(_)
            | Err(Error::InvalidZipFormat { .. })
            | Err(Error::DistrictNotFound { .. }) => {}
            Err(err) => prop_assert!(false, "unexpected error class: {err}"),
        }
    }
}
