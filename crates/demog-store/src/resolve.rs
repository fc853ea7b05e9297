//! Maps a source file and sheet selector onto a readable delimited file.
//!
//! Workbooks are consumed through per-sheet delimited exports: the sheet
//! `TAB` of `NAME.xlsx` lives at `NAME/TAB.csv` (or `.tsv`) next to the
//! workbook. A workbook path that already holds delimited text is read as is.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::csv::Delimiter;
use crate::error::{Result, StoreError};

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Zip (xlsx/xlsm/ods) and OLE2 (xls) container signatures.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const OLE_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

/// A source resolved to a concrete delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub delimiter: Delimiter,
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn delimiter_for(path: &Path) -> Option<Delimiter> {
    match extension_of(path).as_str() {
        "csv" | "txt" => Some(Delimiter::Comma),
        "tsv" => Some(Delimiter::Tab),
        _ => None,
    }
}

fn is_binary_container(path: &Path) -> Result<bool> {
    let mut file = File::open(path).map_err(|e| StoreError::Io {
        operation: "open",
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut magic = [0u8; 4];
    let read = file.read(&mut magic).map_err(|e| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(read == magic.len() && (magic == ZIP_MAGIC || magic == OLE_MAGIC))
}

/// Resolves `path` (and the workbook `sheet`, if any) to a delimited file.
pub fn resolve_source(path: &Path, sheet: Option<&str>) -> Result<ResolvedSource> {
    if let Some(delimiter) = delimiter_for(path) {
        if !path.is_file() {
            return Err(StoreError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        if let Some(sheet) = sheet {
            tracing::debug!(path = %path.display(), sheet, "sheet ignored for delimited source");
        }
        return Ok(ResolvedSource {
            path: path.to_path_buf(),
            delimiter,
        });
    }

    let extension = extension_of(path);
    if !WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        return Err(StoreError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: if extension.is_empty() {
                "no file extension".to_string()
            } else {
                format!("'.{extension}' files are not supported")
            },
        });
    }

    if let Some(sheet) = sheet {
        let export_dir = path.with_extension("");
        for (ext, delimiter) in [("csv", Delimiter::Comma), ("tsv", Delimiter::Tab)] {
            let candidate = export_dir.join(format!("{sheet}.{ext}"));
            if candidate.is_file() {
                tracing::debug!(
                    workbook = %path.display(),
                    export = %candidate.display(),
                    "using sheet export"
                );
                return Ok(ResolvedSource {
                    path: candidate,
                    delimiter,
                });
            }
        }
    }

    if !path.is_file() {
        return Err(StoreError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    if is_binary_container(path)? {
        let reason = match sheet {
            Some(sheet) => format!(
                "workbook has no delimited export for sheet '{sheet}' at {}",
                path.with_extension("").join(format!("{sheet}.csv")).display()
            ),
            None => "workbook given without a sheet selector".to_string(),
        };
        return Err(StoreError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason,
        });
    }

    Ok(ResolvedSource {
        path: path.to_path_buf(),
        delimiter: Delimiter::Comma,
    })
}
