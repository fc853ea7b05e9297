//! Integration tests for the render module against a real store.

use std::fs;

use comfy_table::{ContentArrangement, Table};
use demog_cli::render::{catalog_table, join_table, load_summary_table};
use demog_map::{Crosswalk, join_by_country_code};
use demog_store::{TableStore, load_csv_directory};
use tempfile::TempDir;

fn unwrapped(mut table: Table) -> String {
    table.set_content_arrangement(ContentArrangement::Disabled);
    table.to_string()
}

fn populated_store() -> (TempDir, TableStore) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(
        input.join("un_iso3_map.csv"),
        "Location code,ISO3 Alpha-code\n496,MNG\n4,AFG\n",
    )
    .unwrap();
    fs::write(
        input.join("crude_birth_rate.csv"),
        "Index,Country code,1980-1984\n1,496,20.0\n2,900,30.0\n",
    )
    .unwrap();
    let store = TableStore::open(dir.path().join("store")).unwrap();
    (dir, store)
}

#[test]
fn load_summary_lists_each_table() {
    let (dir, mut store) = populated_store();
    let summary = load_csv_directory(&mut store, &dir.path().join("input")).unwrap();

    let rendered = unwrapped(load_summary_table(&summary));
    assert!(rendered.contains("un_iso3_map"));
    assert!(rendered.contains("crude_birth_rate"));
}

#[test]
fn join_table_reports_unmapped_codes() {
    let (dir, mut store) = populated_store();
    load_csv_directory(&mut store, &dir.path().join("input")).unwrap();
    let crosswalk = Crosswalk::build(&store).unwrap();
    let report = join_by_country_code(&mut store, "crude_birth_rate", &crosswalk).unwrap();

    let rendered = unwrapped(join_table(&[report]));
    assert!(rendered.contains("crude_birth_rate_mapped"));
    assert!(rendered.contains("900"));
}

#[test]
fn catalog_shows_mapped_state() {
    let (dir, mut store) = populated_store();
    load_csv_directory(&mut store, &dir.path().join("input")).unwrap();
    let crosswalk = Crosswalk::build(&store).unwrap();
    join_by_country_code(&mut store, "crude_birth_rate", &crosswalk).unwrap();

    let rendered = unwrapped(catalog_table(store.tables()));
    assert!(rendered.contains("crude_birth_rate_mapped"));
    assert!(rendered.contains("mapped"));
    assert!(rendered.contains("loaded"));
}
