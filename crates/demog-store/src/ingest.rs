//! Bulk loading: every registered source, or every CSV in a directory.

use std::path::{Path, PathBuf};

use demog_model::{ModelError, SourceId, SourceRegistry, sanitize_table_name};

use crate::error::{Result, StoreError};
use crate::store::TableStore;

/// Which registered sources to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection<'a> {
    /// Every registered source; missing files are skipped.
    All,
    /// The named sources; a missing file is an error.
    Only(&'a [SourceId]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub source: Option<SourceId>,
    pub table: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub source: SourceId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<LoadedTable>,
    pub skipped: Vec<SkippedSource>,
}

/// Lists all CSV files in a directory, sorted by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::Io {
        operation: "read directory",
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| StoreError::Io {
            operation: "read directory",
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Loads registered sources found under `input_dir`.
pub fn load_sources(
    store: &mut TableStore,
    registry: &SourceRegistry,
    input_dir: &Path,
    selection: SourceSelection<'_>,
) -> Result<LoadSummary> {
    if !input_dir.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let specs = match selection {
        SourceSelection::All => registry.iter().collect::<Vec<_>>(),
        SourceSelection::Only(ids) => ids
            .iter()
            .map(|id| {
                registry
                    .get(*id)
                    .ok_or_else(|| ModelError::UnknownSource(id.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    let mut summary = LoadSummary::default();
    for spec in specs {
        let path = input_dir.join(&spec.file_name);
        match store.load_source(input_dir, spec) {
            Ok(entry) => summary.loaded.push(LoadedTable {
                source: Some(spec.id),
                table: spec.table.clone(),
                path,
                rows: entry.rows,
                columns: entry.columns.len(),
            }),
            Err(StoreError::SourceNotFound { path }) if selection == SourceSelection::All => {
                tracing::warn!(source = %spec.id, path = %path.display(), "source file missing, skipped");
                summary.skipped.push(SkippedSource {
                    source: spec.id,
                    path,
                });
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        loaded = summary.loaded.len(),
        skipped = summary.skipped.len(),
        "source load finished"
    );
    Ok(summary)
}

/// Loads every `*.csv` in `dir` (header on the first row) into a table
/// named after the file stem.
pub fn load_csv_directory(store: &mut TableStore, dir: &Path) -> Result<LoadSummary> {
    let files = list_csv_files(dir)?;
    let mut summary = LoadSummary::default();

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let table = sanitize_table_name(stem);
        if summary.loaded.iter().any(|loaded| loaded.table == table) {
            tracing::warn!(table = %table, path = %path.display(), "file stem collides with an earlier file, replacing");
            summary.loaded.retain(|loaded| loaded.table != table);
        }
        let entry = store.load(&path, 0, None, &table)?;
        summary.loaded.push(LoadedTable {
            source: None,
            table,
            rows: entry.rows,
            columns: entry.columns.len(),
            path,
        });
    }

    tracing::info!(
        dir = %dir.display(),
        loaded = summary.loaded.len(),
        "csv directory load finished"
    );
    Ok(summary)
}
