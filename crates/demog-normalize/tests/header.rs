//! Header parser properties.

use demog_model::HeaderMode;
use demog_normalize::{HeaderClass, PeriodKind, classify_header, parse_headers};
use proptest::prelude::*;

fn modes() -> impl Strategy<Value = HeaderMode> {
    prop_oneof![Just(HeaderMode::Midpoint), Just(HeaderMode::BandLowerBound)]
}

#[test]
fn documented_examples() {
    let key = |label: &str, mode| match classify_header(label, mode) {
        HeaderClass::Period { key, .. } => key.value(),
        other => panic!("{label} classified as {other:?}"),
    };
    assert_eq!(key("1980", HeaderMode::Midpoint), 1980.0);
    assert_eq!(key("1980-1984", HeaderMode::Midpoint), 1982.5);
    assert_eq!(key("95+", HeaderMode::Midpoint), 97.5);
    assert_eq!(key("95+", HeaderMode::BandLowerBound), 95.0);
}

proptest! {
    #[test]
    fn classification_is_deterministic(label in "\\PC{0,12}", mode in modes()) {
        prop_assert_eq!(classify_header(&label, mode), classify_header(&label, mode));
    }

    #[test]
    fn range_midpoint_adds_offset(start in 0u32..3000, width in 1u32..10) {
        let label = format!("{start}-{}", start + width);
        match classify_header(&label, HeaderMode::Midpoint) {
            HeaderClass::Period { key, kind } => {
                prop_assert_eq!(kind, PeriodKind::Range);
                prop_assert_eq!(key.value(), f64::from(start) + 2.5);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn range_lower_bound_is_start(start in 0u32..3000, width in 1u32..10) {
        let label = format!("{start}-{}", start + width);
        match classify_header(&label, HeaderMode::BandLowerBound) {
            HeaderClass::Period { key, .. } => {
                prop_assert_eq!(key.as_integer(), Some(i64::from(start)));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn bare_years_ignore_mode(year in 0u32..3000, mode in modes()) {
        match classify_header(&year.to_string(), mode) {
            HeaderClass::Period { key, kind } => {
                prop_assert_eq!(kind, PeriodKind::Year);
                prop_assert_eq!(key.as_integer(), Some(i64::from(year)));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn parsed_keys_are_unique_and_sorted(starts in proptest::collection::btree_set(0u32..200, 0..20)) {
        let labels: Vec<String> = starts.iter().rev().map(|s| format!("{}-{}", s * 5, s * 5 + 4)).collect();
        let map = parse_headers(&labels, HeaderMode::BandLowerBound).unwrap();
        prop_assert_eq!(map.periods.len(), starts.len());
        prop_assert!(map.periods.windows(2).all(|pair| pair[0].key < pair[1].key));
    }
}
