//! Crosswalk construction and the country-code join against a real store.

use std::fs;
use std::path::Path;

use demog_map::{Crosswalk, MapError, join_by_country_code};
use demog_model::{Iso3Code, TableState, UnCode};
use demog_store::{StoreError, TableQuery, TableStore, any_to_string};
use proptest::prelude::*;
use tempfile::TempDir;

const LOCATIONS: &str = "Index,Location,Location code,ISO3 Alpha-code\n\
1,World,900,\n\
2,Mongolia,496,MNG\n\
3,Afghanistan,4,AFG\n";

fn load(store: &mut TableStore, dir: &Path, table: &str, content: &str) {
    let path = dir.join(format!("{table}.src.csv"));
    fs::write(&path, content).unwrap();
    store.load(&path, 0, None, table).unwrap();
}

fn setup() -> (TempDir, TableStore) {
    let dir = TempDir::new().unwrap();
    let mut store = TableStore::open(dir.path().join("store")).unwrap();
    load(&mut store, dir.path(), "un_iso3_map", LOCATIONS);
    (dir, store)
}

#[test]
fn crosswalk_drops_rows_without_alpha_code() {
    let (_dir, store) = setup();
    let crosswalk = Crosswalk::build(&store).unwrap();
    assert_eq!(crosswalk.len(), 2);
    assert_eq!(crosswalk.dropped_rows(), 1);
    assert_eq!(
        crosswalk.iso3(UnCode::new(496)),
        Some(&Iso3Code::new("MNG").unwrap())
    );
    assert_eq!(crosswalk.iso3(UnCode::new(900)), None);
}

#[test]
fn crosswalk_build_is_idempotent() {
    let (_dir, store) = setup();
    assert_eq!(
        Crosswalk::build(&store).unwrap(),
        Crosswalk::build(&store).unwrap()
    );
}

#[test]
fn crosswalk_requires_locations_table() {
    let dir = TempDir::new().unwrap();
    let store = TableStore::open(dir.path()).unwrap();
    assert!(matches!(
        Crosswalk::build(&store),
        Err(MapError::Store(StoreError::TableNotFound { .. }))
    ));
}

#[test]
fn join_excludes_unmapped_rows_and_drops_index() {
    let (dir, mut store) = setup();
    load(
        &mut store,
        dir.path(),
        "crude_birth_rate",
        "Index,Country code,1980-1984,1985-1989\n1,496,20.0,\n2,900,30.1,29.0\n3,4,48.0,47.5\n",
    );
    let crosswalk = Crosswalk::build(&store).unwrap();

    let report = join_by_country_code(&mut store, "crude_birth_rate", &crosswalk).unwrap();

    assert_eq!(report.output, "crude_birth_rate_mapped");
    assert_eq!(report.input_rows, 3);
    assert_eq!(report.output_rows, 2);
    assert_eq!(report.excluded_rows(), 1);
    assert!(report.unmapped_codes.contains("900"));
    assert_eq!(store.state("crude_birth_rate_mapped"), TableState::Mapped);
    assert_eq!(store.state("crude_birth_rate"), TableState::Loaded);

    let mapped = store
        .query(&TableQuery::new("crude_birth_rate_mapped").filter_eq("iso3", "MNG"))
        .unwrap();
    assert_eq!(mapped.height(), 1);
    assert!(mapped.column("Index").is_err());
    assert_eq!(
        any_to_string(mapped.column("Country code").unwrap().get(0).unwrap()),
        "496"
    );
}

#[test]
fn repeated_join_keeps_column_set() {
    let (dir, mut store) = setup();
    load(
        &mut store,
        dir.path(),
        "total_population",
        "Index,Country code,Reference date (as of 1 July),0-4\n1,496,1950,120.5\n",
    );
    let crosswalk = Crosswalk::build(&store).unwrap();

    join_by_country_code(&mut store, "total_population", &crosswalk).unwrap();
    let first = store.entry("total_population_mapped").unwrap().columns.clone();
    join_by_country_code(&mut store, "total_population", &crosswalk).unwrap();
    let second = store.entry("total_population_mapped").unwrap().columns.clone();

    assert_eq!(first, second);
    assert_eq!(
        first,
        vec!["Country code", "Reference date (as of 1 July)", "0-4", "iso3"]
    );
}

#[test]
fn join_requires_loaded_table() {
    let (dir, mut store) = setup();
    load(
        &mut store,
        dir.path(),
        "absolute_deaths",
        "Country code,0-4\n496,3.2\n",
    );
    let crosswalk = Crosswalk::build(&store).unwrap();
    join_by_country_code(&mut store, "absolute_deaths", &crosswalk).unwrap();

    let result = join_by_country_code(&mut store, "absolute_deaths_mapped", &crosswalk);
    assert!(matches!(
        result,
        Err(MapError::Store(StoreError::InvalidState { .. }))
    ));
    let result = join_by_country_code(&mut store, "missing", &crosswalk);
    assert!(matches!(
        result,
        Err(MapError::Store(StoreError::TableNotFound { .. }))
    ));
}

#[test]
fn join_requires_country_code_column() {
    let (dir, mut store) = setup();
    load(&mut store, dir.path(), "bcg", "ISO_code,1980\nMNG,87\n");
    let crosswalk = Crosswalk::build(&store).unwrap();
    assert!(matches!(
        join_by_country_code(&mut store, "bcg", &crosswalk),
        Err(MapError::Store(StoreError::ColumnNotFound { .. }))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn join_never_adds_rows(codes in proptest::collection::vec(prop_oneof![Just(496u32), Just(4), Just(8), Just(900)], 1..12)) {
        let (dir, mut store) = setup();
        let mut content = String::from("Country code,1980-1984\n");
        for code in &codes {
            content.push_str(&format!("{code},1.5\n"));
        }
        load(&mut store, dir.path(), "crude_birth_rate", &content);
        let crosswalk = Crosswalk::build(&store).unwrap();

        let report = join_by_country_code(&mut store, "crude_birth_rate", &crosswalk).unwrap();

        let mappable = codes.iter().filter(|code| **code == 496 || **code == 4).count();
        prop_assert!(report.output_rows <= report.input_rows);
        prop_assert_eq!(report.output_rows, mappable);
        prop_assert_eq!(report.output_rows == report.input_rows, mappable == codes.len());
    }
}
