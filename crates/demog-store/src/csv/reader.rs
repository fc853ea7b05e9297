//! Delimited file reading with an explicit header row.
//!
//! Rows are CSV records, not physical lines: a quoted cell may span several
//! lines and still counts as one row. Blank lines are not counted.

use std::collections::BTreeSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord};
use polars::prelude::{Column, CsvParseOptions, CsvReadOptions, DataFrame, SerReader};

use crate::error::{Result, StoreError};

use super::header::normalize_header;

/// Field separator of a delimited source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }
}

/// Header labels of a source and where its first data record starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderRecord {
    labels: Vec<String>,
    /// Byte offset of the first data record, if there is one.
    body_start: Option<usize>,
}

/// Reads a source file into memory.
pub fn read_source_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn parse_error(path: &Path, error: &::csv::Error) -> StoreError {
    StoreError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn locate_header(
    path: &Path,
    bytes: &[u8],
    header_row: usize,
    delimiter: Delimiter,
) -> Result<HeaderRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(bytes);
    let mut record = StringRecord::new();

    for _ in 0..=header_row {
        let found = reader
            .read_record(&mut record)
            .map_err(|e| parse_error(path, &e))?;
        if !found {
            return Err(StoreError::MissingHeader {
                path: path.to_path_buf(),
                row: header_row,
            });
        }
    }

    let raw: Vec<String> = record.iter().map(normalize_header).collect();
    if raw.iter().all(String::is_empty) {
        return Err(StoreError::MissingHeader {
            path: path.to_path_buf(),
            row: header_row,
        });
    }

    let mut seen = BTreeSet::new();
    let mut labels = Vec::with_capacity(raw.len());
    for (idx, label) in raw.into_iter().enumerate() {
        let label = if label.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            label
        };
        if !seen.insert(label.clone()) {
            return Err(StoreError::DuplicateColumn {
                path: path.to_path_buf(),
                column: label,
            });
        }
        labels.push(label);
    }

    let mut next = StringRecord::new();
    let body_start = if reader
        .read_record(&mut next)
        .map_err(|e| parse_error(path, &e))?
    {
        next.position().map(|position| position.byte() as usize)
    } else {
        None
    };

    Ok(HeaderRecord { labels, body_start })
}

/// Reads the labels on row `header_row` (zero-based).
///
/// Empty labels are named `column_<n>` (one-based) so every column stays
/// addressable. Duplicate labels are rejected.
pub fn read_header_row(path: &Path, header_row: usize, delimiter: Delimiter) -> Result<Vec<String>> {
    let bytes = read_source_bytes(path)?;
    Ok(locate_header(path, &bytes, header_row, delimiter)?.labels)
}

/// Parses delimited `bytes` read from `path` into a DataFrame.
///
/// Rows before `header_row` are discarded, column types are inferred from
/// the whole body, empty cells become nulls, and columns carry the
/// normalized labels from [`read_header_row`].
pub fn parse_delimited_table(
    path: &Path,
    mut bytes: Vec<u8>,
    header_row: usize,
    delimiter: Delimiter,
) -> Result<DataFrame> {
    let header = locate_header(path, &bytes, header_row, delimiter)?;

    let Some(body_start) = header.body_start else {
        let columns: Vec<Column> = header
            .labels
            .iter()
            .map(|label| Column::new(label.as_str().into(), Vec::<String>::new()))
            .collect();
        return Ok(DataFrame::new(columns)?);
    };
    let body = bytes.split_off(body_start);

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_separator(delimiter.as_byte()))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() != header.labels.len() {
        return Err(StoreError::Parse {
            path: path.to_path_buf(),
            message: format!(
                "header row has {} labels but {} columns were parsed",
                header.labels.len(),
                df.width()
            ),
        });
    }

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(&header.labels)
        .map(|(column, name)| column.clone().with_name(name.as_str().into()))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Reads a delimited file into a DataFrame. See [`parse_delimited_table`].
pub fn read_delimited_table(
    path: &Path,
    header_row: usize,
    delimiter: Delimiter,
) -> Result<DataFrame> {
    let bytes = read_source_bytes(path)?;
    parse_delimited_table(path, bytes, header_row, delimiter)
}
