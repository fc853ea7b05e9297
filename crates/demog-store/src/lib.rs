//! File-backed tabular store.
//!
//! Tables are loaded from delimited source files (or per-sheet exports of
//! workbooks), persisted as CSV under a store directory, and read back
//! through equality-filtered projection queries.

pub mod catalog;
pub mod csv;
pub mod error;
pub mod ingest;
pub mod io;
pub mod polars_utils;
pub mod query;
pub mod resolve;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, Provenance};
pub use error::{Result, StoreError};
pub use ingest::{
    LoadSummary, LoadedTable, SkippedSource, SourceSelection, list_csv_files, load_csv_directory,
    load_sources,
};
pub use polars_utils::{any_to_f64, any_to_string, any_to_string_non_empty, cell_string};
pub use query::{Projection, TableQuery};
pub use resolve::{ResolvedSource, resolve_source};
pub use store::TableStore;
