//! Atomic table and catalog writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::{Result, StoreError};

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes through a temp file next to `path`, then renames it over `path`.
///
/// Readers see either the previous contents or the new contents, never a
/// partial file.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    if let Err(err) = write(&mut file, &temp_path) {
        drop(file);
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Writes `df` as a comma-separated file with a header row.
pub fn save_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    write_atomic(path, |file, temp_path| {
        CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .map_err(|e| StoreError::Io {
                operation: "write",
                path: temp_path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })
    })
}

/// Writes `bytes` verbatim.
pub fn save_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    write_atomic(path, |file, temp_path| {
        file.write_all(bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.to_path_buf(),
            source: e,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_table_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bcg.csv");
        let mut df = df! {
            "ISO_code" => &["MNG", "AFG"],
            "1980" => &[Some(20.0), None],
        }
        .unwrap();

        save_table(&mut df, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ISO_code,1980"));
        assert!(lines.next().unwrap().starts_with("MNG,20"));
        assert_eq!(lines.next(), Some("AFG,"));
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_save_bytes_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        save_bytes(b"{}", &path).unwrap();
        save_bytes(b"{\"tables\":{}}", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"tables\":{}}");
    }

    #[test]
    fn test_failed_write_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        save_bytes(b"a\n1\n", &path).unwrap();

        let result = write_atomic(&path, |_, temp_path| {
            Err(StoreError::Io {
                operation: "write",
                path: temp_path.to_path_buf(),
                source: std::io::Error::other("boom"),
            })
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n1\n");
        assert!(!temp_path_for(&path).exists());
    }
}
