//! File-backed table store.
//!
//! A store is a directory of `<table>.csv` files plus `catalog.json`. Loading
//! or deriving a table replaces any table of the same name wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use polars::prelude::DataFrame;

use demog_model::{SourceSpec, TableState, validate_table_name};

use crate::catalog::{CATALOG_FILE, Catalog, CatalogEntry, Provenance};
use crate::csv::{parse_delimited_table, read_source_bytes};
use crate::error::{Result, StoreError};
use crate::io::{hash_bytes, load_table, save_table};
use crate::query::TableQuery;
use crate::resolve::resolve_source;

#[derive(Debug)]
pub struct TableStore {
    root: PathBuf,
    catalog: Catalog,
}

impl TableStore {
    /// Opens the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: root.clone(),
            source: e,
        })?;
        let catalog = Catalog::load(&root.join(CATALOG_FILE))?;
        tracing::debug!(
            root = %root.display(),
            tables = catalog.tables.len(),
            "opened table store"
        );
        Ok(Self { root, catalog })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.csv"))
    }

    /// Reads one source file into `destination`, replacing any existing
    /// table of that name.
    ///
    /// `header_row` is the zero-based row holding the column labels; rows
    /// above it are discarded. `sheet` selects a workbook tab.
    pub fn load(
        &mut self,
        source: &Path,
        header_row: usize,
        sheet: Option<&str>,
        destination: &str,
    ) -> Result<&CatalogEntry> {
        validate_table_name(destination)?;
        let resolved = resolve_source(source, sheet)?;
        let bytes = read_source_bytes(&resolved.path)?;
        let sha256 = hash_bytes(&bytes);
        let df = parse_delimited_table(&resolved.path, bytes, header_row, resolved.delimiter)?;
        tracing::info!(
            table = destination,
            path = %resolved.path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded source"
        );
        self.replace_table(
            destination,
            df,
            TableState::Loaded,
            Provenance::Source {
                path: resolved.path,
                sha256,
            },
        )
    }

    /// Loads a registered source found under `input_dir`.
    pub fn load_source(&mut self, input_dir: &Path, spec: &SourceSpec) -> Result<&CatalogEntry> {
        let path = input_dir.join(&spec.file_name);
        self.load(&path, spec.header_row, spec.sheet.as_deref(), &spec.table)
    }

    /// Writes `df` as `table`, discarding prior contents.
    pub fn replace_table(
        &mut self,
        table: &str,
        mut df: DataFrame,
        state: TableState,
        provenance: Provenance,
    ) -> Result<&CatalogEntry> {
        validate_table_name(table)?;
        save_table(&mut df, &self.table_path(table))?;

        let entry = CatalogEntry {
            state,
            provenance,
            rows: df.height(),
            columns: df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            updated_at: Utc::now(),
        };
        if self.catalog.insert(table, entry).is_some() {
            tracing::debug!(table, "replaced existing table");
        }
        self.catalog.save(&self.root.join(CATALOG_FILE))?;

        self.catalog
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.to_string(),
            })
    }

    /// Full contents of `table`.
    pub fn table(&self, table: &str) -> Result<DataFrame> {
        if self.catalog.get(table).is_none() {
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
            });
        }
        let path = self.table_path(table);
        if !path.is_file() {
            tracing::warn!(table, path = %path.display(), "catalog entry without table file");
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
            });
        }
        load_table(&path)
    }

    /// Runs an equality-filtered projection query.
    pub fn query(&self, query: &TableQuery) -> Result<DataFrame> {
        let df = self.table(query.table())?;
        query.apply(df)
    }

    pub fn state(&self, table: &str) -> TableState {
        self.catalog.state(table)
    }

    pub fn entry(&self, table: &str) -> Option<&CatalogEntry> {
        self.catalog.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.catalog.get(table).is_some()
    }

    /// Tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.catalog
            .tables
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Fails unless `table` is in `expected` state.
    pub fn require_state(&self, table: &str, expected: TableState) -> Result<()> {
        match self.state(table) {
            TableState::Absent => Err(StoreError::TableNotFound {
                table: table.to_string(),
            }),
            actual if actual == expected => Ok(()),
            actual => Err(StoreError::InvalidState {
                table: table.to_string(),
                expected,
                actual,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demog_model::SourceId;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_records_catalog_entry() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "bcg.csv", "ISO_code,1980\nMNG,87\n");
        let mut store = TableStore::open(dir.path().join("store")).unwrap();

        let entry = store.load(&source, 0, None, "bcg").unwrap();
        assert_eq!(entry.state, TableState::Loaded);
        assert_eq!(entry.rows, 1);
        assert_eq!(entry.columns, vec!["ISO_code", "1980"]);
        assert!(dir.path().join("store").join("bcg.csv").is_file());
        assert_eq!(store.state("bcg"), TableState::Loaded);
    }

    #[test]
    fn test_catalog_survives_reopen() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "bcg.csv", "ISO_code,1980\nMNG,87\n");
        let root = dir.path().join("store");
        {
            let mut store = TableStore::open(&root).unwrap();
            store.load(&source, 0, None, "bcg").unwrap();
        }
        let store = TableStore::open(&root).unwrap();
        assert!(store.contains("bcg"));
        assert_eq!(store.table("bcg").unwrap().height(), 1);
    }

    #[test]
    fn test_missing_table_is_not_found() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.query(&TableQuery::new("bcg")),
            Err(StoreError::TableNotFound { table }) if table == "bcg"
        ));
        assert_eq!(store.state("bcg"), TableState::Absent);
    }

    #[test]
    fn test_rejects_illegal_destination() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "x.csv", "a\n1\n");
        let mut store = TableStore::open(dir.path().join("store")).unwrap();
        assert!(matches!(
            store.load(&source, 0, None, "../escape"),
            Err(StoreError::Model(_))
        ));
    }

    #[test]
    fn test_load_source_uses_registry_offsets() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "life_expectancy_2015.csv",
            "title\nsubtitle\nnotes\nCountry,Value\nMongolia,69.5\n",
        );
        let spec = SourceSpec::new(
            SourceId::LifeExpectancy2015,
            "life_expectancy_2015.csv",
            3,
            None,
            "life_expectancy_2015",
        );
        let mut store = TableStore::open(dir.path().join("store")).unwrap();
        let entry = store.load_source(dir.path(), &spec).unwrap();
        assert_eq!(entry.columns, vec!["Country", "Value"]);
        assert_eq!(entry.rows, 1);
    }

    #[test]
    fn test_require_state() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "t.csv", "a\n1\n");
        let mut store = TableStore::open(dir.path().join("store")).unwrap();
        store.load(&source, 0, None, "t").unwrap();

        assert!(store.require_state("t", TableState::Loaded).is_ok());
        assert!(matches!(
            store.require_state("t", TableState::Mapped),
            Err(StoreError::InvalidState { .. })
        ));
        assert!(matches!(
            store.require_state("u", TableState::Loaded),
            Err(StoreError::TableNotFound { .. })
        ));
    }
}
