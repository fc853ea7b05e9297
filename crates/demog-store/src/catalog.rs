//! Table catalog persisted as `catalog.json` in the store directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use demog_model::TableState;

use crate::error::{Result, StoreError};
use crate::io::save_bytes;

/// Catalog file name inside the store directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// Current catalog schema version.
pub const CATALOG_VERSION: u32 = 1;

/// Where a table's rows came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Read from a file on disk.
    Source {
        path: PathBuf,
        /// SHA-256 of the file at load time.
        sha256: String,
    },
    /// Derived from another table in the store.
    Derived { parent: String },
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source { path, .. } => write!(f, "{}", path.display()),
            Self::Derived { parent } => write!(f, "<- {parent}"),
        }
    }
}

/// One table in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub state: TableState,
    pub provenance: Provenance,
    pub rows: usize,
    pub columns: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    pub tables: BTreeMap<String, CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            tables: BTreeMap::new(),
        }
    }
}

impl Catalog {
    /// Reads the catalog, or returns an empty one when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| StoreError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| StoreError::Catalog {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|e| StoreError::Catalog {
            path: path.to_path_buf(),
            source: e,
        })?;
        save_bytes(&bytes, path)
    }

    pub fn get(&self, table: &str) -> Option<&CatalogEntry> {
        self.tables.get(table)
    }

    pub fn insert(&mut self, table: impl Into<String>, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.tables.insert(table.into(), entry)
    }

    pub fn state(&self, table: &str) -> TableState {
        self.tables
            .get(table)
            .map(|entry| entry.state)
            .unwrap_or_default()
    }
}
