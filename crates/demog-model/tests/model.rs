//! Cross-module checks on the shared model.

use demog_model::{
    CountryCode, Indicator, PeriodKey, SourceId, SourceRegistry, TableState, mapped_table_name,
};
use proptest::prelude::*;

#[test]
fn every_indicator_base_table_is_a_registered_destination() {
    let registry = SourceRegistry::standard().expect("standard registry");
    for indicator in Indicator::ALL {
        assert!(
            registry.by_table(indicator.base_table()).is_some(),
            "{indicator} has no source"
        );
    }
}

#[test]
fn mapped_tables_follow_naming_rule() {
    for indicator in Indicator::ALL {
        let table = demog_model::IndicatorTable::new(indicator, TableState::Mapped);
        assert_eq!(table.table_name(), mapped_table_name(indicator.base_table()));
    }
}

#[test]
fn source_names_round_trip() {
    for id in SourceId::ALL {
        assert_eq!(id.name().parse::<SourceId>().unwrap(), id);
    }
}

#[test]
fn table_state_serializes_lowercase() {
    let json = serde_json::to_string(&TableState::Mapped).unwrap();
    assert_eq!(json, "\"mapped\"");
}

proptest! {
    #[test]
    fn midpoint_is_start_plus_offset(start in 1900u32..2100) {
        let key = PeriodKey::range_midpoint(f64::from(start)).unwrap();
        prop_assert_eq!(key.value(), f64::from(start) + 2.5);
        prop_assert!(!key.is_integral());
    }

    #[test]
    fn lower_bound_is_integral(start in 0u32..120) {
        let key = PeriodKey::band_lower_bound(f64::from(start)).unwrap();
        prop_assert_eq!(key.as_integer(), Some(i64::from(start)));
    }

    #[test]
    fn numeric_country_codes_parse_as_un(code in 1u32..1000) {
        let parsed: CountryCode = code.to_string().parse().unwrap();
        prop_assert_eq!(parsed.to_string(), code.to_string());
        prop_assert!(parsed.as_iso3().is_none());
    }
}
